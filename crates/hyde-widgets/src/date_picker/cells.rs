#![forbid(unsafe_code)]

//! Pages of selectable cells.
//!
//! A page is one column of the picker: a block of years, the twelve months
//! of a year, or the 6x7 day grid of a month. With `columns > 1` several
//! consecutive pages are shown side by side, centred on the anchor's page.

use hyde_core::{Constraints, DateValue, Unit, ViewKind};

/// Rows and columns of the day grid.
pub const DAY_GRID_CELLS: usize = 42;
pub const MONTHS_PER_PAGE: u32 = 12;

/// One selectable (or greyed-out) value on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellDescriptor {
    /// View the cell belongs to.
    pub view: ViewKind,
    pub value: DateValue,
    pub selectable: bool,
    pub is_today: bool,
    pub is_selected: bool,
    /// Day cells spilling over from the previous or next month.
    pub is_other_period: bool,
}

/// One column of cells plus its heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellPage {
    pub view: ViewKind,
    /// First instant of the period the page covers (start of year block,
    /// January of the year, or the 1st of the month).
    pub period_start: DateValue,
    pub title: String,
    pub cells: Vec<CellDescriptor>,
    /// ISO week number of each row for day pages when enabled.
    pub week_numbers: Vec<u32>,
}

/// Inputs that decide the marks on each cell.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Marks<'a> {
    pub constraints: &'a Constraints,
    pub selected: DateValue,
    pub today: DateValue,
    pub columns: u32,
    pub week_numbers: bool,
}

/// Pages before the anchor's page when `columns` pages are shown.
pub(crate) fn leading_pages(columns: u32) -> u32 {
    columns.max(1).saturating_sub(1) / 2
}

/// First year of the `years_per_page` block containing `year`.
pub(crate) fn block_start(year: i32, years_per_page: u32) -> i32 {
    let per = years_per_page.max(1) as i32;
    year - year.rem_euclid(per)
}

/// Anchor of the first visible page.
pub(crate) fn first_page_anchor(view: ViewKind, anchor: DateValue, marks: &Marks<'_>) -> DateValue {
    let lead = leading_pages(marks.columns);
    match view {
        ViewKind::Years => {
            let per = marks.constraints.page_years();
            let start = block_start(anchor.year(), per) - (lead * per) as i32;
            anchor.with_year(start)
        }
        ViewKind::Months => anchor.decrement(Unit::Year, lead),
        ViewKind::Days | ViewKind::Time => anchor.with_day(1).decrement(Unit::Month, lead),
    }
}

/// First and last instants covered by the visible pages around `anchor`.
pub(crate) fn window_bounds(
    view: ViewKind,
    anchor: DateValue,
    marks: &Marks<'_>,
) -> (DateValue, DateValue) {
    let first = first_page_anchor(view, anchor, marks);
    let columns = marks.columns.max(1);
    match view {
        ViewKind::Years => {
            let per = marks.constraints.page_years();
            let start = first.with_year_month(first.year(), 1).with_day(1);
            let end_year = first.year() + (per * columns) as i32 - 1;
            (start, start.with_year_month(end_year, 12).with_day(31))
        }
        ViewKind::Months => {
            let start = first.with_year_month(first.year(), 1).with_day(1);
            let end_year = first.year() + columns as i32 - 1;
            (start, start.with_year_month(end_year, 12).with_day(31))
        }
        ViewKind::Days | ViewKind::Time => {
            let start = first.with_day(1);
            let last_month = start.increment(Unit::Month, columns - 1);
            (start, last_month.with_day(31))
        }
    }
}

/// Build every visible page for `view` around `anchor`.
pub(crate) fn build_pages(view: ViewKind, anchor: DateValue, marks: &Marks<'_>) -> Vec<CellPage> {
    if view == ViewKind::Time {
        return Vec::new();
    }
    let first = first_page_anchor(view, anchor, marks);
    (0..marks.columns.max(1))
        .map(|page| match view {
            ViewKind::Years => {
                let per = marks.constraints.page_years();
                let start = first.with_year(first.year() + (page * per) as i32);
                year_page(start, marks)
            }
            ViewKind::Months => month_page(first.increment(Unit::Year, page), marks),
            _ => day_page(first.increment(Unit::Month, page), marks),
        })
        .collect()
}

fn year_page(start: DateValue, marks: &Marks<'_>) -> CellPage {
    let per = marks.constraints.page_years();
    let first_year = start.year();
    let cells = (0..per)
        .map(|offset| {
            let value = start.with_year(first_year + offset as i32);
            CellDescriptor {
                view: ViewKind::Years,
                value,
                selectable: !marks.constraints.year_unavailable(value.year()),
                is_today: value.year() == marks.today.year(),
                is_selected: value.year() == marks.selected.year(),
                is_other_period: false,
            }
        })
        .collect();
    CellPage {
        view: ViewKind::Years,
        period_start: start.with_year_month(first_year, 1).with_day(1).clear_time(),
        title: format!("{}-{}", first_year, first_year + per as i32 - 1),
        cells,
        week_numbers: Vec::new(),
    }
}

fn month_page(anchor: DateValue, marks: &Marks<'_>) -> CellPage {
    let year = anchor.year();
    let cells = (1..=MONTHS_PER_PAGE)
        .map(|month| {
            let value = anchor.with_year_month(year, month);
            let same_month = |other: &DateValue| other.year() == year && other.month() == month;
            CellDescriptor {
                view: ViewKind::Months,
                value,
                selectable: !marks.constraints.month_unavailable(year, month),
                is_today: same_month(&marks.today),
                is_selected: same_month(&marks.selected),
                is_other_period: false,
            }
        })
        .collect();
    CellPage {
        view: ViewKind::Months,
        period_start: anchor.with_year_month(year, 1).with_day(1).clear_time(),
        title: year.to_string(),
        cells,
        week_numbers: Vec::new(),
    }
}

fn day_page(anchor: DateValue, marks: &Marks<'_>) -> CellPage {
    let first_of_month = anchor.with_day(1);
    let grid_start = first_of_month.rewind_to_weekday(marks.constraints.first_weekday());
    let cells: Vec<CellDescriptor> = (0..DAY_GRID_CELLS as u32)
        .map(|offset| {
            let value = grid_start.increment(Unit::Day, offset);
            CellDescriptor {
                view: ViewKind::Days,
                value,
                selectable: !marks.constraints.day_unavailable(&value),
                is_today: value.same_day(&marks.today),
                is_selected: value.same_day(&marks.selected),
                is_other_period: value.year() != first_of_month.year()
                    || value.month() != first_of_month.month(),
            }
        })
        .collect();
    let week_numbers = if marks.week_numbers {
        cells
            .chunks(7)
            .map(|row| row[0].value.iso_week())
            .collect()
    } else {
        Vec::new()
    };
    CellPage {
        view: ViewKind::Days,
        period_start: first_of_month.clear_time(),
        title: format!("{} {}", first_of_month.month_abbr(), first_of_month.year()),
        cells,
        week_numbers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> DateValue {
        DateValue::from_ymd(y, m, day).expect("valid date")
    }

    fn marks(constraints: &Constraints, columns: u32) -> Marks<'_> {
        Marks {
            constraints,
            selected: d(2024, 6, 15),
            today: d(2024, 6, 20),
            columns,
            week_numbers: true,
        }
    }

    #[test]
    fn block_start_aligns_negative_years() {
        assert_eq!(block_start(1987, 20), 1980);
        assert_eq!(block_start(2000, 20), 2000);
        assert_eq!(block_start(-5, 20), -20);
    }

    #[test]
    fn leading_pages_centres_odd_columns() {
        assert_eq!(leading_pages(0), 0);
        assert_eq!(leading_pages(1), 0);
        assert_eq!(leading_pages(2), 0);
        assert_eq!(leading_pages(3), 1);
        assert_eq!(leading_pages(5), 2);
    }

    #[test]
    fn three_year_columns_centre_on_anchor_block() {
        let c = Constraints::new();
        let pages = build_pages(ViewKind::Years, d(1987, 3, 4), &marks(&c, 3));
        let titles: Vec<_> = pages.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, ["1960-1979", "1980-1999", "2000-2019"]);
    }

    #[test]
    fn day_page_week_numbers_follow_rows() {
        let c = Constraints::new();
        let pages = build_pages(ViewKind::Days, d(2024, 1, 10), &marks(&c, 1));
        // 2024-01-01 is a Monday, ISO week 1.
        assert_eq!(pages[0].week_numbers.len(), 6);
        assert_eq!(pages[0].week_numbers[0], 1);
        assert_eq!(pages[0].title, "Jan 2024");
    }

    #[test]
    fn window_bounds_cover_all_columns() {
        let c = Constraints::new();
        let (start, end) = window_bounds(ViewKind::Days, d(2024, 6, 15), &marks(&c, 3));
        assert_eq!(start, d(2024, 5, 1));
        assert_eq!(end, d(2024, 7, 31));

        let (start, end) = window_bounds(ViewKind::Months, d(2024, 6, 15), &marks(&c, 1));
        assert_eq!(start, d(2024, 1, 1));
        assert_eq!(end, d(2024, 12, 31));
    }

    #[test]
    fn time_view_has_no_pages() {
        let c = Constraints::new();
        assert!(build_pages(ViewKind::Time, d(2024, 6, 15), &marks(&c, 1)).is_empty());
    }
}
