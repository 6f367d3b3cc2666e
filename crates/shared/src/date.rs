use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

pub const ISO_DATE: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Longest trip accepted, in calendar days with both endpoints included.
pub const MAX_TRIP_DAYS: i64 = 90;

pub fn parse_date(value: &str) -> crate::Result<Date> {
    Ok(Date::parse(value.trim(), ISO_DATE)?)
}

pub fn format_date(date: Date) -> String {
    // ISO_DATE only contains calendar components, formatting a Date cannot fail.
    date.format(ISO_DATE).unwrap_or_default()
}

/// Whole calendar days spanned by `start..=end`.
///
/// An end before the start yields zero or a negative count.
pub fn trip_length(start: Date, end: Date) -> i64 {
    (end - start).whole_days() + 1
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: Date,
    pub end: Date,
}

impl DateRange {
    pub fn new(start: Option<Date>, end: Option<Date>) -> crate::Result<Self> {
        let (Some(start), Some(end)) = (start, end) else {
            crate::validation!("Please select a start and end date for your trip.");
        };

        let days = trip_length(start, end);
        if days < 1 {
            crate::validation!("The trip must be at least 1 day long.");
        }

        if days > MAX_TRIP_DAYS {
            crate::validation!("The trip cannot be longer than {MAX_TRIP_DAYS} days.");
        }

        Ok(Self { start, end })
    }

    pub fn parse(start: Option<&str>, end: Option<&str>) -> crate::Result<Self> {
        let start = start.filter(|v| !v.trim().is_empty()).map(parse_date).transpose()?;
        let end = end.filter(|v| !v.trim().is_empty()).map(parse_date).transpose()?;

        Self::new(start, end)
    }

    pub fn days(&self) -> i64 {
        trip_length(self.start, self.end)
    }

    pub fn dates(&self) -> impl Iterator<Item = Date> + '_ {
        std::iter::successors(Some(self.start), |d| d.next_day()).take_while(|d| *d <= self.end)
    }

    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", format_date(self.start), format_date(self.end))
    }
}
