#![forbid(unsafe_code)]

mod cache;
mod client;
mod document;
mod error;
mod harvest;
mod listing;
mod page;
mod query;
mod resolver;
mod response;

pub use cache::Cached;

pub use client::{
    HeaderError, HttpError, LanguageInvalidError, Transport, UreqTransport, WikipediaClient,
    WikipediaClientConfig, language_link, wikipedia_api_with_language,
};

pub use document::{PageDocument, detect_redirect_target};

pub use error::LookupError;

pub use harvest::{DEFAULT_IMAGE_DIRECTORY, HarvestReport, ImageHarvester};

pub use listing::{
    AllPagesOptions, CascadeFilter, CategoryMembersOptions, Direction, LanguageLinksFilter,
    Listing, MemberProperty, MemberType, ProtectionExpiry, ProtectionLevel, ProtectionType,
    RedirectFilter, SortField,
};

pub use page::{
    CATEGORY_PREFIX, Entry, EntryDetail, EntryWithId, PageInfo, PageTitle, Section, TextFormat,
    TextSource, is_category_title,
};

pub use query::Query;

pub use resolver::{Encyclopedia, canonical_key};

pub use url::Url;

pub use isolang::Language;
