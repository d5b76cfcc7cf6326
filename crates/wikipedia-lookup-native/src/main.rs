use wikipedia_lookup::{
    Encyclopedia, Language, LookupError, PageTitle, TextFormat, WikipediaClient,
    WikipediaClientConfig,
};

fn main() {
    pretty_env_logger::init();

    let mut args = std::env::args();

    args.next();

    let mut config = WikipediaClientConfig::default();

    if let Some(lang) = args.next() {
        if let Some(language) = Language::from_639_1(lang.as_str()) {
            config = config.language(language)
        } else {
            log::warn!("Language entered is invalid, using English")
        }
    }

    let mut searches = args.collect::<Vec<_>>();

    if searches.is_empty() {
        searches.push("Potato".to_string());
    }

    let client = match WikipediaClient::from_config(config) {
        Ok(client) => client,
        Err(e) => {
            log::error!("Failed to create client: {e}");
            return;
        }
    };

    let mut encyclopedia = Encyclopedia::new();

    for search in searches {
        if let Err(e) = look_up(&client, &mut encyclopedia, &search) {
            log::error!("Looking up '{search}' failed: {e}");
        }
    }

    println!("Looked up {} entries", encyclopedia.len());
}

fn look_up(
    client: &WikipediaClient,
    encyclopedia: &mut Encyclopedia,
    search: &str,
) -> Result<(), LookupError> {
    for entry in encyclopedia.find(client, search)? {
        println!("# {} ({})", entry.title(), entry.full_url());

        if let Some(target) = entry.redirect_target(client)? {
            println!("Redirects to: {target}");
        }

        if let Some(summary) = client.summary(&*entry)? {
            println!("\n{summary}\n");
        }

        for section in entry.sections(client)?.unwrap_or_default() {
            let indent = "  ".repeat(section.toc_level.saturating_sub(1) as usize);
            println!("{indent}{} {}", section.number, section.line);
        }

        let categories = entry
            .categories(client)?
            .unwrap_or_default()
            .iter()
            .map(PageTitle::title)
            .collect::<Vec<_>>();

        println!("\nCategories: {}", categories.join(", "));

        if let Some(links) = client.other_languages(&*entry)? {
            println!("Also in {} other languages", links.len());
        }

        if let Some(wikitext) = client.text(&*entry, TextFormat::Wikitext)? {
            println!("Source is {} bytes of wikitext", wikitext.len());
        }
    }

    Ok(())
}
