use regex::Regex;

macro_rules! lazy_regex {
    ($name:ident = $pattern:expr) => {
        static $name: once_cell::sync::Lazy<Regex> =
            once_cell::sync::Lazy::new(|| Regex::new($pattern).expect("invalid regex"));
    };
}

/// Emoji that carry a trafficking meaning, mapped to the word the rule
/// dataset knows them by. Extend here; matching picks the words up as-is.
pub const EMOJI_TOKENS: &[(&str, &str)] = &[
    ("\u{1F48A}", "pills"),    // pill
    ("\u{1F489}", "needle"),   // syringe
    ("\u{1F343}", "weed"),     // leaf fluttering in wind
    ("\u{1F33F}", "weed"),     // herb
    ("\u{1F341}", "weed"),     // maple leaf
    ("\u{1F966}", "weed"),     // broccoli
    ("\u{2744}", "snow"),      // snowflake
    ("\u{26C4}", "snow"),      // snowman without snow
    ("\u{1F328}", "snow"),     // cloud with snow
    ("\u{1F4B0}", "money"),    // money bag
    ("\u{1F4B8}", "money"),    // money with wings
    ("\u{1F911}", "money"),    // money-mouth face
    ("\u{1F4B5}", "cash"),     // dollar banknote
    ("\u{1F4B6}", "cash"),     // euro banknote
    ("\u{1F4B7}", "cash"),     // pound banknote
    ("\u{1F50C}", "plug"),     // electric plug
    ("\u{1F4E6}", "package"),  // package
    ("\u{1F69A}", "delivery"), // delivery truck
    ("\u{1F344}", "shrooms"),  // mushroom
    ("\u{1F40E}", "horse"),    // horse
    ("\u{1F36C}", "candy"),    // candy
    ("\u{1F48A}\u{200D}\u{1F4E6}", "pills package"), // pill + ZWJ + package
];

const VARIATION_SELECTOR: char = '\u{FE0F}';

/// Strips URLs, email addresses and phone numbers, spells out known emoji and
/// collapses whitespace. Removed spans are replaced by a space so that no new
/// token can form across them, which keeps the function idempotent.
pub fn normalize(raw: &str) -> String {
    lazy_regex!(URL_RE = r"(?i)[a-z][a-z0-9+.\-]*://\S*");
    lazy_regex!(EMAIL_RE = r"[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}");
    lazy_regex!(PHONE_RE = r"\+?\b[0-9]{7,15}\b");

    let text: String = raw.chars().filter(|c| *c != VARIATION_SELECTOR).collect();
    let text = URL_RE.replace_all(&text, " ");
    let text = EMAIL_RE.replace_all(&text, " ");
    let text = PHONE_RE.replace_all(&text, " ");
    let text = replace_emoji(&text);
    collapse_whitespace(&text)
}

pub fn collapse_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Keys may span several scalars (ZWJ or keycap sequences); the longest key
/// starting at a position wins. Keys never contain U+FE0F, which is stripped
/// before this runs.
fn replace_emoji(input: &str) -> String {
    let mut buf = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(ch) = rest.chars().next() {
        let found = EMOJI_TOKENS
            .iter()
            .filter(|(emoji, _)| !emoji.is_empty() && rest.starts_with(emoji))
            .max_by_key(|(emoji, _)| emoji.len());
        match found {
            Some((emoji, word)) => {
                buf.push(' ');
                buf.push_str(word);
                buf.push(' ');
                rest = &rest[emoji.len()..];
            }
            None => {
                buf.push(ch);
                rest = &rest[ch.len_utf8()..];
            }
        }
    }
    buf
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Naive split on `.`; blank fragments are not sentences.
pub fn sentence_count(text: &str) -> usize {
    text.split('.').filter(|s| !s.trim().is_empty()).count()
}

/// Lower-cased runs of alphanumeric characters.
pub fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric() && c != '\'')
        .map(|w| w.trim_matches('\'').to_lowercase())
        .filter(|w| !w.is_empty())
}
