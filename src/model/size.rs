use serde::Serialize;

/// Running sizes for some category of objects
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Serialize)]
pub struct SizeTally {
    /// Objects found in local storage
    pub count: u64,
    pub disk_size: u64,
    pub inflated_size: u64,
    /// Objects that could not be looked up locally
    pub missing_count: u64,
}

impl SizeTally {
    pub fn add_present(&mut self, disk_size: u64, inflated_size: u64) {
        self.count += 1;
        self.disk_size += disk_size;
        self.inflated_size += inflated_size;
    }

    pub fn add_missing(&mut self) {
        self.missing_count += 1;
    }

    pub fn merge(&mut self, other: &SizeTally) {
        self.count += other.count;
        self.disk_size += other.disk_size;
        self.inflated_size += other.inflated_size;
        self.missing_count += other.missing_count;
    }

    /// Every id folded in, present or not
    pub fn observed(&self) -> u64 {
        self.count + self.missing_count
    }
}

/// A labeled tally, as kept in totals and ranked tables
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize)]
pub struct SizeRecord {
    pub label: String,
    #[serde(flatten)]
    pub tally: SizeTally,
}

impl SizeRecord {
    pub fn new(label: impl Into<String>, tally: SizeTally) -> Self {
        Self {
            label: label.into(),
            tally,
        }
    }
}
