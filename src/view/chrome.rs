pub const APP_TITLE: &str = "Code Cart & P-Bag Tracker";

pub fn header() -> String {
    format!("{}\n(add new: codecart add --help)\n", APP_TITLE)
}

pub fn footer(year: i32) -> String {
    format!(
        "\n{} {}. Verify physical contents against the checklist before relying on this list.",
        APP_TITLE, year
    )
}
