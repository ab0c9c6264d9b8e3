use super::enums::Category;
use super::item::ScheduleItem;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

const MAP_SEARCH: &str = "https://www.google.com/maps/search/?api=1&query=";
const TAG_SEARCH: &str = "https://www.instagram.com/explore/tags/";

/// Unreserved characters stay literal
const QUERY: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// True for "lat, long" text such as "35.6581, 138.5683"
pub fn is_lat_long(text: &str) -> bool {
    let Some((lat, long)) = text.split_once(',') else {
        return false;
    };
    let parse = |s: &str| s.trim().parse::<f64>().ok();
    match (parse(lat), parse(long)) {
        (Some(lat), Some(long)) => (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&long),
        _ => false,
    }
}

fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(|s| s.trim()).filter(|s| !s.is_empty())
}

/// Text to search the map for
pub fn map_query(item: &ScheduleItem) -> String {
    let summary = item.summary();

    if item.category == Category::Scouting {
        if let Some(keyword) = non_blank(summary.and_then(|s| s.location_keyword.as_ref())) {
            if is_lat_long(keyword) {
                return keyword.to_string();
            }
        }
    }

    non_blank(summary.and_then(|s| s.primary_info.as_ref()))
        .unwrap_or(item.name.as_str())
        .to_string()
}

pub fn map_url(item: &ScheduleItem) -> String {
    format!("{}{}", MAP_SEARCH, utf8_percent_encode(&map_query(item), QUERY))
}

/// Hashtag for social search: whitespace stripped
pub fn social_tag(item: &ScheduleItem) -> String {
    let source = non_blank(item.search_name.as_ref())
        .or_else(|| non_blank(item.summary().and_then(|s| s.primary_info.as_ref())))
        .unwrap_or(item.name.as_str());
    source.chars().filter(|c| !c.is_whitespace()).collect()
}

pub fn social_url(item: &ScheduleItem) -> String {
    format!("{}{}/", TAG_SEARCH, utf8_percent_encode(&social_tag(item), QUERY))
}
