// src/multimap.rs
//! Непрерывный мультимап: пакетная вставка, затем сортировка и запросы по диапазону.

/// Мультимап поверх отсортированного вектора пар `(ключ, значение)`.
///
/// Пары сначала накапливаются через [`SortedMultimap::insert`], затем
/// [`SortedMultimap::finalize`] сортирует их и удаляет дубликаты. Запросы
/// допустимы только после финализации.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortedMultimap<K, V> {
    entries: Vec<(K, V)>,
    sorted: bool,
}

impl<K, V> Default for SortedMultimap<K, V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            sorted: true,
        }
    }
}

impl<K: Ord + Copy, V: Ord + Copy> SortedMultimap<K, V> {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            sorted: true,
        }
    }

    pub fn insert(&mut self, key: K, value: V) {
        self.entries.push((key, value));
        self.sorted = false;
    }

    pub fn finalize(&mut self) {
        self.entries.sort_unstable();
        self.entries.dedup();
        self.sorted = true;
    }

    /// Все значения по ключу в порядке возрастания
    pub fn get(&self, key: K) -> impl Iterator<Item = V> + '_ {
        assert!(self.sorted, "SortedMultimap queried before finalize()");
        let start = self.entries.partition_point(|&(k, _)| k < key);
        let end = self.entries.partition_point(|&(k, _)| k <= key);
        self.entries[start..end].iter().map(|&(_, v)| v)
    }

    #[must_use]
    pub fn contains(&self, key: K, value: V) -> bool {
        assert!(self.sorted, "SortedMultimap queried before finalize()");
        self.entries.binary_search(&(key, value)).is_ok()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (K, V)> + '_ {
        self.entries.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_query_after_finalize() {
        let mut map = SortedMultimap::with_capacity(8);
        map.insert(3, 30);
        map.insert(1, 11);
        map.insert(3, 31);
        map.insert(1, 10);
        map.insert(3, 30);
        map.finalize();

        assert_eq!(map.get(1).collect::<Vec<_>>(), vec![10, 11]);
        assert_eq!(map.get(3).collect::<Vec<_>>(), vec![30, 31]);
        assert_eq!(map.get(2).count(), 0);
        assert_eq!(map.len(), 4);
        assert!(map.contains(3, 31));
        assert!(!map.contains(3, 32));
    }

    #[test]
    #[should_panic(expected = "before finalize")]
    fn query_before_finalize_panics() {
        let mut map = SortedMultimap::with_capacity(1);
        map.insert(1u32, 2u32);
        let _ = map.get(1).count();
    }
}
