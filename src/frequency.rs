use std::collections::HashMap;

/// Occurrence counts keyed by string representation, in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct FrequencyCounter {
    entries: Vec<(String, usize)>,
    positions: HashMap<String, usize>,
    total: usize,
}

impl FrequencyCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ingest(&mut self, value: String) {
        self.total += 1;
        match self.positions.get(&value) {
            Some(&idx) => self.entries[idx].1 += 1,
            None => {
                self.positions.insert(value.clone(), self.entries.len());
                self.entries.push((value, 1));
            }
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn distinct(&self) -> usize {
        self.entries.len()
    }

    /// Most frequent value; ties go to whichever was seen first.
    pub fn most_common(&self) -> Option<(&str, usize)> {
        let mut best: Option<(&str, usize)> = None;
        for (value, count) in &self.entries {
            if best.is_none_or(|(_, top)| *count > top) {
                best = Some((value.as_str(), *count));
            }
        }
        best
    }

    pub fn entries(&self) -> &[(String, usize)] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<(String, usize)> {
        self.entries
    }
}

impl FromIterator<String> for FrequencyCounter {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut counter = FrequencyCounter::new();
        for value in iter {
            counter.ingest(value);
        }
        counter
    }
}
