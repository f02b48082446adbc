use fancy_regex::Regex;

use hondana_lib::models::current_year;

/// Strip markup from a catalog synopsis. `<br>` variants become real line
/// breaks first, every remaining tag is dropped.
pub fn clean_description(raw: &str) -> String {
    let Ok(br_re) = Regex::new(r"(?i)<br\s*/?>") else {
        return raw.to_string();
    };
    let Ok(tag_re) = Regex::new(r"<[^>]+>") else {
        return raw.to_string();
    };

    let text = br_re.replace_all(raw, "\n");
    tag_re.replace_all(&text, "").into_owned()
}

/// Pull the leading year out of a date-like string such as `1999-09-21` or
/// a bare `1999`. Missing or unparsable dates fall back to the current year.
pub fn parse_year(date: Option<&str>) -> i32 {
    date.and_then(|d| d.split('-').next())
        .and_then(|year| year.trim().parse().ok())
        .unwrap_or_else(current_year)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_clean_description() {
        assert_eq!(
            clean_description("First line.<br>Second line.<br />Third."),
            "First line.\nSecond line.\nThird."
        );
        assert_eq!(
            clean_description("An <i>italic</i> title and a <b>bold</b> one."),
            "An italic title and a bold one."
        );
        assert_eq!(clean_description("plain text"), "plain text");
        assert_eq!(clean_description(""), "");
    }

    #[test]
    fn test_parse_year() {
        assert_eq!(parse_year(Some("1999-09-21")), 1999);
        assert_eq!(parse_year(Some("2004")), 2004);
        assert_eq!(parse_year(Some("not a date")), current_year());
        assert_eq!(parse_year(Some("")), current_year());
        assert_eq!(parse_year(None), current_year());
    }
}
