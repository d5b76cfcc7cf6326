/// A field that is fetched at most once and then reused
///
/// There are three states: not fetched yet, fetched with an empty value,
/// and fetched with data. A fetched empty `Vec` is never confused with a
/// field nobody asked for yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cached<T> {
    value: Option<T>,
}

impl<T> Default for Cached<T> {
    fn default() -> Self {
        Cached { value: None }
    }
}

impl<T> Cached<T> {
    pub fn is_fetched(&self) -> bool {
        self.value.is_some()
    }

    // All the 'get' functions here never make requests
    pub fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn insert(&mut self, value: T) -> &T {
        self.value.insert(value)
    }

    /// Forget the stored value so the next access fetches again
    pub fn clear(&mut self) -> Option<T> {
        self.value.take()
    }

    /// Return the stored value, or run `init` and store what it returns.
    /// An error leaves the field unfetched.
    pub fn get_or_try_init<E>(&mut self, init: impl FnOnce() -> Result<T, E>) -> Result<&T, E> {
        match &mut self.value {
            Some(value) => Ok(&*value),
            slot => Ok(&*slot.insert(init()?)),
        }
    }

    /// Like [`Cached::get_or_try_init`], but `fetch` may find nothing, in
    /// which case the field stays unfetched
    pub fn get_or_try_fetch<E>(
        &mut self,
        fetch: impl FnOnce() -> Result<Option<T>, E>,
    ) -> Result<Option<&T>, E> {
        match &mut self.value {
            Some(value) => Ok(Some(&*value)),
            slot => match fetch()? {
                Some(value) => Ok(Some(&*slot.insert(value))),
                None => Ok(None),
            },
        }
    }
}

#[cfg(test)]
mod test {
    use super::Cached;
    use std::cell::Cell;

    #[test]
    fn fetches_once() {
        let calls = Cell::new(0);
        let mut cached = Cached::default();

        for _ in 0..3 {
            let value = cached
                .get_or_try_init(|| {
                    calls.set(calls.get() + 1);
                    Ok::<_, ()>(vec![1, 2, 3])
                })
                .unwrap();

            assert_eq!(value, &vec![1, 2, 3]);
        }

        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn empty_is_still_fetched() {
        let mut cached: Cached<Vec<u8>> = Cached::default();
        assert!(!cached.is_fetched());

        cached.get_or_try_fetch(|| Ok::<_, ()>(Some(Vec::new()))).unwrap();

        assert!(cached.is_fetched());
        assert_eq!(cached.get(), Some(&Vec::new()));
    }

    #[test]
    fn nothing_found_stays_unfetched() {
        let mut cached: Cached<Vec<u8>> = Cached::default();

        assert_eq!(cached.get_or_try_fetch(|| Ok::<_, ()>(None)), Ok(None));
        assert!(!cached.is_fetched());

        assert!(cached.get_or_try_init(|| Err("offline")).is_err());
        assert!(!cached.is_fetched());
    }
}
