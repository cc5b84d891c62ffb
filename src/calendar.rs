//! Calendar Grid Logic
//!
//! Day/week layout of the task calendar: visible dates, navigation steps,
//! Spanish headings and the cell each task lands in.

use chrono::{Datelike, Days, NaiveDate, Weekday};

use crate::models::{Task, TaskStatus};

pub const FIRST_HOUR: u32 = 0;
pub const LAST_HOUR: u32 = 23;

const MONTHS: [&str; 12] = [
    "enero", "febrero", "marzo", "abril", "mayo", "junio",
    "julio", "agosto", "septiembre", "octubre", "noviembre", "diciembre",
];
const MONTHS_SHORT: [&str; 12] = [
    "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sept", "oct", "nov", "dic",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CalendarMode {
    Day,
    #[default]
    Week,
}

impl CalendarMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CalendarMode::Day => "day",
            CalendarMode::Week => "week",
        }
    }

    fn span(&self) -> u64 {
        match self {
            CalendarMode::Day => 1,
            CalendarMode::Week => 7,
        }
    }
}

/// Monday of the week containing `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Days::new(date.weekday().num_days_from_monday() as u64)
}

/// Date columns shown for the anchor date
pub fn visible_days(anchor: NaiveDate, mode: CalendarMode) -> Vec<NaiveDate> {
    let first = match mode {
        CalendarMode::Day => anchor,
        CalendarMode::Week => week_start(anchor),
    };
    (0..mode.span()).map(|offset| first + Days::new(offset)).collect()
}

/// Previous or next page: one day in day mode, seven in week mode
pub fn step(anchor: NaiveDate, mode: CalendarMode, forward: bool) -> NaiveDate {
    let days = Days::new(mode.span());
    if forward {
        anchor + days
    } else {
        anchor - days
    }
}

fn month_name(date: NaiveDate) -> &'static str {
    MONTHS[date.month0() as usize]
}

fn month_short(date: NaiveDate) -> &'static str {
    MONTHS_SHORT[date.month0() as usize]
}

pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "lunes",
        Weekday::Tue => "martes",
        Weekday::Wed => "miércoles",
        Weekday::Thu => "jueves",
        Weekday::Fri => "viernes",
        Weekday::Sat => "sábado",
        Weekday::Sun => "domingo",
    }
}

/// Column header in week mode, e.g. `MIÉ`
pub fn day_header(date: NaiveDate) -> String {
    weekday_name(date.weekday()).chars().take(3).collect::<String>().to_uppercase()
}

/// Heading above the grid
pub fn title(anchor: NaiveDate, mode: CalendarMode) -> String {
    match mode {
        CalendarMode::Day => format!(
            "{}, {} de {} de {}",
            weekday_name(anchor.weekday()),
            anchor.day(),
            month_name(anchor),
            anchor.year()
        ),
        CalendarMode::Week => {
            let start = week_start(anchor);
            let end = start + Days::new(6);
            if start.month() == end.month() {
                format!("{} - {} {} de {}", start.day(), end.day(), month_name(start), start.year())
            } else {
                format!(
                    "{} {} - {} {} {}",
                    start.day(),
                    month_short(start),
                    end.day(),
                    month_short(end),
                    end.year()
                )
            }
        }
    }
}

/// Row label, e.g. `12:00 AM`
pub fn hour_label(hour: u32) -> String {
    let suffix = if hour < 12 { "AM" } else { "PM" };
    let hour12 = if hour % 12 == 0 { 12 } else { hour % 12 };
    format!("{}:00 {}", hour12, suffix)
}

/// `14:05` -> `2:05 PM`
pub fn format_time_12h(time: &str) -> Option<String> {
    let (hours, minutes) = parse_time(time)?;
    let suffix = if hours >= 12 { "PM" } else { "AM" };
    let hour12 = if hours % 12 == 0 { 12 } else { hours % 12 };
    Some(format!("{}:{:02} {}", hour12, minutes, suffix))
}

fn parse_time(time: &str) -> Option<(u32, u32)> {
    let (h, m) = time.trim().split_once(':')?;
    let hours: u32 = h.parse().ok()?;
    let minutes: u32 = m.get(..2).unwrap_or(m).parse().ok()?;
    (hours <= LAST_HOUR && minutes < 60).then_some((hours, minutes))
}

/// Prefilled time of the quick-create form
pub fn cell_time(hour: u32) -> String {
    format!("{:02}:00", hour)
}

/// Cell a task lands in; untimed tasks go to the first cell of their day
pub fn slot_for(task: &Task) -> Option<(NaiveDate, u32)> {
    let date = task.naive_date()?;
    let hour = task
        .time_of_day()
        .and_then(parse_time)
        .map(|(h, _)| h)
        .unwrap_or(FIRST_HOUR);
    Some((date, hour))
}

/// Date line of a kanban card, e.g. `May 1, 2024 - 2:30 PM`
pub fn card_schedule(task: &Task) -> String {
    let date = match task.naive_date() {
        Some(date) => date.format("%b %-d, %Y").to_string(),
        None => task.date_key().to_string(),
    };
    match task.time_of_day().and_then(format_time_12h) {
        Some(time) => format!("{} - {}", date, time),
        None => date,
    }
}

/// CSS modifier for a task status, e.g. `por-hacer`
pub fn status_class(status: TaskStatus) -> String {
    status.wire().to_lowercase().replace(' ', "-")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_week_starts_monday() {
        // Sunday 9 June 2024 belongs to the week of Monday 3 June
        assert_eq!(week_start(date(2024, 6, 9)), date(2024, 6, 3));
        assert_eq!(week_start(date(2024, 6, 3)), date(2024, 6, 3));
        let days = visible_days(date(2024, 6, 5), CalendarMode::Week);
        assert_eq!(days.len(), 7);
        assert_eq!(days[6], date(2024, 6, 9));
        assert_eq!(visible_days(date(2024, 6, 5), CalendarMode::Day), vec![date(2024, 6, 5)]);
    }

    #[test]
    fn test_titles() {
        assert_eq!(title(date(2024, 6, 5), CalendarMode::Week), "3 - 9 junio de 2024");
        assert_eq!(title(date(2024, 5, 29), CalendarMode::Week), "27 may - 2 jun 2024");
        assert_eq!(title(date(2024, 6, 3), CalendarMode::Day), "lunes, 3 de junio de 2024");
        assert_eq!(day_header(date(2024, 6, 5)), "MIÉ");
    }

    #[test]
    fn test_navigation_steps() {
        let anchor = date(2024, 6, 5);
        assert_eq!(step(anchor, CalendarMode::Day, false), date(2024, 6, 4));
        assert_eq!(step(anchor, CalendarMode::Week, true), date(2024, 6, 12));
    }

    #[test]
    fn test_hour_labels() {
        assert_eq!(hour_label(0), "12:00 AM");
        assert_eq!(hour_label(12), "12:00 PM");
        assert_eq!(hour_label(15), "3:00 PM");
        assert_eq!(format_time_12h("14:05").as_deref(), Some("2:05 PM"));
        assert_eq!(format_time_12h("nope"), None);
        assert_eq!(cell_time(9), "09:00");
    }

    #[test]
    fn test_task_slots() {
        let mut task = Task {
            id: "1".into(),
            title: "t".into(),
            detail: None,
            date: "2024-06-05T00:00:00.000Z".into(),
            time: Some("14:30".into()),
            status: TaskStatus::Doing,
        };
        assert_eq!(slot_for(&task), Some((date(2024, 6, 5), 14)));
        task.time = None;
        assert_eq!(slot_for(&task), Some((date(2024, 6, 5), FIRST_HOUR)));
        assert_eq!(status_class(TaskStatus::Todo), "por-hacer");
    }

    #[test]
    fn test_card_schedule() {
        let mut task = crate::board::tests::task("a", "2024-05-01", TaskStatus::Todo);
        assert_eq!(card_schedule(&task), "May 1, 2024");
        task.time = Some("14:30".into());
        assert_eq!(card_schedule(&task), "May 1, 2024 - 2:30 PM");
    }
}
