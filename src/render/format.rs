use chrono::{Utc, DateTime};

pub fn format_date_time(datetime: &DateTime<Utc>, now: &DateTime<Utc>) -> String {
    let d = now.signed_duration_since(*datetime);
    if d.num_days() > 365 {
        datetime.format("%b %d %Y").to_string()
    } else if d.num_days() > 0 {
        datetime.format("%b %d").to_string()
    } else if d.num_hours() > 0 {
        format!("{}h ago", d.num_hours())
    } else {
        "just now".to_string()
    }
}
