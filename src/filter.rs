use std::fmt;

use crate::models::CompletedSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RangeBand {
    #[default]
    UpTo10,
    From10To50,
    From50To100,
    Over100,
}

impl RangeBand {
    pub const ALL: [RangeBand; 4] = [
        RangeBand::UpTo10,
        RangeBand::From10To50,
        RangeBand::From50To100,
        RangeBand::Over100,
    ];

    /// Unknown names fall back to the first band.
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "0-10" => RangeBand::UpTo10,
            "10-50" => RangeBand::From10To50,
            "50-100" => RangeBand::From50To100,
            "100+" => RangeBand::Over100,
            _ => RangeBand::default(),
        }
    }

    pub fn contains(self, amount: f64) -> bool {
        match self {
            RangeBand::UpTo10 => amount <= 10.0,
            RangeBand::From10To50 => amount > 10.0 && amount <= 50.0,
            RangeBand::From50To100 => amount > 50.0 && amount <= 100.0,
            RangeBand::Over100 => amount > 100.0,
        }
    }

    pub fn next(self) -> Self {
        let pos = Self::ALL.iter().position(|b| *b == self).unwrap_or(0);
        Self::ALL[(pos + 1) % Self::ALL.len()]
    }

    pub fn label(self) -> &'static str {
        match self {
            RangeBand::UpTo10 => "0-10",
            RangeBand::From10To50 => "10-50",
            RangeBand::From50To100 => "50-100",
            RangeBand::Over100 => "100+",
        }
    }
}

impl fmt::Display for RangeBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    Completed,
    Pending,
    Range(RangeBand),
}

impl Filter {
    /// Build a filter from its mode name and, for `range`, a band name.
    /// Unknown modes mean `all`.
    pub fn parse(mode: &str, band: Option<&str>) -> Self {
        match mode.trim().to_lowercase().as_str() {
            "completed" => Filter::Completed,
            "pending" => Filter::Pending,
            "range" => Filter::Range(band.map(RangeBand::parse).unwrap_or_default()),
            _ => Filter::All,
        }
    }

    /// all -> completed -> pending -> range -> all, keeping `band` for range.
    pub fn next(self, band: RangeBand) -> Self {
        match self {
            Filter::All => Filter::Completed,
            Filter::Completed => Filter::Pending,
            Filter::Pending => Filter::Range(band),
            Filter::Range(_) => Filter::All,
        }
    }

    pub fn matches(self, index: usize, amount: f64, completed: &CompletedSet) -> bool {
        match self {
            Filter::All => true,
            Filter::Completed => completed.contains(index),
            Filter::Pending => !completed.contains(index),
            Filter::Range(band) => band.contains(amount),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::All => f.write_str("all"),
            Filter::Completed => f.write_str("completed"),
            Filter::Pending => f.write_str("pending"),
            Filter::Range(band) => write!(f, "range {band}"),
        }
    }
}

/// Indices of the boxes that pass `filter`, in box order.
pub fn filter_indices(amounts: &[f64], completed: &CompletedSet, filter: Filter) -> Vec<usize> {
    amounts
        .iter()
        .enumerate()
        .filter(|(i, amount)| filter.matches(*i, **amount, completed))
        .map(|(i, _)| i)
        .collect()
}
