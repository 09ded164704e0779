//! Gift link codec
//!
//! Links carry one query parameter per descriptor field:
//!
//! ```text
//! gift.html?flower=Rose&message=Happy+Birthday&theme=spring&clicks=3&music=...&sparkle=true
//! ```
//!
//! `music` is only written when present and `sparkle` only when enabled.
//! Decoding is total: any string yields a valid [`GiftDescriptor`]. Links made
//! by the older builder use single letter names (`f`, `m`, `t`, `c`, `s`);
//! those are read when the full name is missing.

use std::borrow::Cow;
use std::str::FromStr;

use percent_encoding::percent_decode_str;
use url::Url;
use uuid::Uuid;

use super::{FlowerKind, GiftDescriptor, Theme};
use crate::garden::EntryId;

const FLOWER: (&str, &str) = ("flower", "f");
const MESSAGE: (&str, &str) = ("message", "m");
const THEME: (&str, &str) = ("theme", "t");
const CLICKS: (&str, &str) = ("clicks", "c");
const SPARKLE: (&str, &str) = ("sparkle", "s");
const MUSIC: &str = "music";
const ENTRY_ID: &str = "id";

/// Page recipients open
pub const GIFT_PAGE: &str = "gift.html";

/// Resolve the gift page next to the builder page.
///
/// `https://host/repo/index.html` and `https://host/repo/` both resolve to
/// `https://host/repo/gift.html`.
pub fn gift_page(builder_page: &Url) -> Url {
    let mut page = builder_page.clone();
    page.set_query(None);
    page.set_fragment(None);

    // Cannot-be-a-base urls (`mailto:` and friends) have no path to resolve against
    page.join(GIFT_PAGE).unwrap_or(page)
}

/// Encode a descriptor as a link against `base`.
///
/// Any query or fragment already on `base` is replaced.
pub fn encode(descriptor: &GiftDescriptor, base: &Url) -> Url {
    let mut link = base.clone();
    link.set_query(None);
    link.set_fragment(None);

    {
        let mut query = link.query_pairs_mut();
        query
            .append_pair(FLOWER.0, descriptor.flower().as_str())
            .append_pair(MESSAGE.0, descriptor.message())
            .append_pair(THEME.0, descriptor.theme().as_str())
            .append_pair(CLICKS.0, &descriptor.required_interactions().to_string());

        if let Some(music) = descriptor.music() {
            query.append_pair(MUSIC, music);
        }

        if descriptor.sparkle() {
            query.append_pair(SPARKLE.0, "true");
        }
    }

    link
}

/// Encode a link to a gift already planted in a garden
pub fn encode_stored(entry_id: &EntryId, base: &Url) -> Url {
    let mut link = base.clone();
    link.set_fragment(None);
    link.set_query(None);
    link.query_pairs_mut()
        .append_pair(ENTRY_ID, &entry_id.to_string());
    link
}

/// Decode any reference string into a normalized descriptor.
///
/// Never fails: missing or malformed fields take their defaults.
pub fn decode(reference: &str) -> GiftDescriptor {
    let params = QueryParams::parse(reference);

    let flower = params
        .decoded(FLOWER)
        .and_then(|flower| FlowerKind::from_str(&flower).ok())
        .unwrap_or_default();

    // A message that fails to decode is treated as missing
    let message = params.decoded(MESSAGE).unwrap_or_default();

    let theme = params
        .decoded(THEME)
        .and_then(|theme| Theme::from_str(&theme).ok())
        .unwrap_or_default();

    let required_interactions = params
        .decoded(CLICKS)
        .and_then(|clicks| parse_leading_int(&clicks))
        .unwrap_or(0);

    let music = params
        .raw(MUSIC)
        .and_then(|music| form_decode(music).map(Cow::into_owned));

    let sparkle = params.decoded(SPARKLE).as_deref() == Some("true");

    GiftDescriptor::new(flower, message, theme, required_interactions, music, sparkle)
}

/// What a reference points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GiftReference {
    /// Self-contained link carrying the whole descriptor
    Inline(GiftDescriptor),
    /// Link to a gift stored in a garden
    Stored(EntryId),
}

impl GiftReference {
    /// Classify a reference.
    ///
    /// A reference with a valid `id` and neither a message nor a flower points
    /// at a stored entry; everything else is decoded inline. A single message
    /// or flower parameter is enough to make it inline, unlike the legacy
    /// page that needed both before it ignored `id`.
    pub fn parse(reference: &str) -> Self {
        let params = QueryParams::parse(reference);

        let carries_gift = params.raw(MESSAGE.0).is_some()
            || params.raw(MESSAGE.1).is_some()
            || params.raw(FLOWER.0).is_some()
            || params.raw(FLOWER.1).is_some();

        if !carries_gift {
            let entry_id = params
                .raw(ENTRY_ID)
                .and_then(form_decode)
                .and_then(|id| Uuid::parse_str(id.trim()).ok());

            if let Some(entry_id) = entry_id {
                return Self::Stored(entry_id.into());
            }
        }

        Self::Inline(decode(reference))
    }
}

/// Raw query pairs of a reference, in order of appearance
struct QueryParams<'a> {
    pairs: Vec<(Cow<'a, str>, &'a str)>,
}

impl<'a> QueryParams<'a> {
    fn parse(reference: &'a str) -> Self {
        let reference = reference
            .split_once('#')
            .map_or(reference, |(before, _)| before);

        // Bare `a=b&c=d` strings are treated as a query on their own
        let query = match reference.split_once('?') {
            Some((_, query)) => query,
            None if reference.contains('=') => reference,
            None => "",
        };

        let pairs = query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .filter_map(|pair| {
                let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
                form_decode(name).map(|name| (name, value))
            })
            .collect();

        Self { pairs }
    }

    /// Undecoded value of the first pair named `name`
    fn raw(&self, name: &str) -> Option<&'a str> {
        self.pairs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| *value)
    }

    /// Decoded value under the full name, falling back to the short alias
    fn decoded(&self, (name, alias): (&str, &str)) -> Option<String> {
        self.raw(name)
            .or_else(|| self.raw(alias))
            .and_then(form_decode)
            .map(Cow::into_owned)
    }
}

/// Percent-decode a form value, `None` when the bytes are not UTF-8
fn form_decode(value: &str) -> Option<Cow<'_, str>> {
    if value.contains('+') {
        let spaced = value.replace('+', " ");
        return percent_decode_str(&spaced)
            .decode_utf8()
            .ok()
            .map(|decoded| Cow::Owned(decoded.into_owned()));
    }

    percent_decode_str(value).decode_utf8().ok()
}

/// Leading integer of `value`, ignoring trailing garbage (`"4 times"` is 4).
///
/// A `0x` or `0X` prefix reads the digits as hexadecimal (`"0x5"` is 5).
/// Saturates instead of overflowing; the caller clamps anyway.
fn parse_leading_int(value: &str) -> Option<i64> {
    let value = value.trim_start();
    let (negative, unsigned) = match value.as_bytes().first() {
        Some(b'-') => (true, &value[1..]),
        Some(b'+') => (false, &value[1..]),
        _ => (false, value),
    };

    let (radix, digits) = match unsigned.get(..2) {
        Some("0x") | Some("0X") => (16, &unsigned[2..]),
        _ => (10, unsigned),
    };

    let digits: Vec<i64> = digits
        .chars()
        .map_while(|c| c.to_digit(radix))
        .map(i64::from)
        .collect();

    if digits.is_empty() {
        return None;
    }

    let magnitude = digits.into_iter().fold(0i64, |acc, d| {
        acc.saturating_mul(i64::from(radix)).saturating_add(d)
    });

    Some(if negative { -magnitude } else { magnitude })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gift::DEFAULT_MESSAGE;

    fn base() -> Url {
        Url::parse("https://example.github.io/Flower_gift/gift.html").unwrap()
    }

    fn birthday() -> GiftDescriptor {
        GiftDescriptor::new(
            FlowerKind::Rose,
            "Happy Birthday",
            Theme::Spring,
            3,
            None,
            true,
        )
    }

    #[test]
    fn test_encode_canonical_order() {
        let link = encode(&birthday(), &base());

        assert_eq!(
            link.as_str(),
            "https://example.github.io/Flower_gift/gift.html?flower=Rose&message=Happy+Birthday&theme=spring&clicks=3&sparkle=true"
        );
    }

    #[test]
    fn test_encode_replaces_existing_query() {
        let base = Url::parse("https://example.com/gift.html?flower=Tulip#reveal").unwrap();
        let link = encode(&birthday(), &base);

        assert_eq!(link.fragment(), None);
        assert_eq!(link.query_pairs().filter(|(k, _)| k == "flower").count(), 1);
        assert_eq!(decode(link.as_str()), birthday());
    }

    #[test]
    fn test_birthday_round_trip() {
        let descriptor = birthday();
        let decoded = decode(encode(&descriptor, &base()).as_str());

        assert_eq!(decoded, descriptor);
        assert_eq!(decoded.flower(), FlowerKind::Rose);
        assert_eq!(decoded.message(), "Happy Birthday");
        assert_eq!(decoded.theme(), Theme::Spring);
        assert_eq!(decoded.required_interactions(), 3);
        assert!(decoded.sparkle());
    }

    #[test]
    fn test_round_trip_awkward_values() {
        let messages = [
            "a+b=c & d%20e",
            "Cześć! 🌹 ありがとう",
            "line one\nline two",
            "?flower=Tulip&theme=winter",
            "#not-a-fragment",
        ];

        for (i, message) in messages.into_iter().enumerate() {
            let descriptor = GiftDescriptor::new(
                FlowerKind::ALL[i % FlowerKind::ALL.len()],
                message,
                Theme::ALL[i % Theme::ALL.len()],
                i as i64 + 1,
                Some(format!("https://cdn.example.com/song.mp3?track={i}&loop=true")),
                i % 2 == 0,
            );

            assert_eq!(decode(encode(&descriptor, &base()).as_str()), descriptor);
        }
    }

    #[test]
    fn test_decode_never_fails() {
        let references = [
            "",
            "?",
            "gift.html",
            "???&&&===",
            "?flower=&message=&theme=&clicks=&sparkle=",
            "?message=%E0%A4%A",
            "?message=%FF%FE",
            "?clicks=ten&flower=Cactus&theme=Monsoon",
            "not a url at all",
            "https://example.com/gift.html#?flower=Tulip",
        ];

        for reference in references {
            let descriptor = decode(reference);
            assert_eq!(descriptor.flower(), FlowerKind::Rose);
            assert_eq!(descriptor.message(), DEFAULT_MESSAGE);
            assert_eq!(descriptor.theme(), Theme::Spring);
            assert_eq!(descriptor.required_interactions(), 3);
            assert_eq!(descriptor.music(), None);
            assert!(!descriptor.sparkle());
        }
    }

    #[test]
    fn test_decode_clicks() {
        let clicks = |value: &str| decode(&format!("?clicks={value}")).required_interactions();

        assert_eq!(clicks("-5"), 3);
        assert_eq!(clicks("0"), 3);
        assert_eq!(clicks("1"), 1);
        assert_eq!(clicks("4abc"), 4);
        assert_eq!(clicks("%207"), 7);
        assert_eq!(clicks("11"), 10);
        assert_eq!(clicks("100"), 10);
        assert_eq!(clicks("99999999999999999999999"), 10);
        assert_eq!(clicks("-99999999999999999999999"), 3);
        assert_eq!(clicks("2.9"), 2);
        assert_eq!(clicks("0x5"), 5);
        assert_eq!(clicks("0XA"), 10);
        assert_eq!(clicks("0x"), 3);
        assert_eq!(clicks("-0x4"), 3);
    }

    #[test]
    fn test_decode_sparkle_exact_literal() {
        assert!(decode("?sparkle=true").sparkle());
        assert!(!decode("?sparkle=TRUE").sparkle());
        assert!(!decode("?sparkle=True").sparkle());
        assert!(!decode("?sparkle=1").sparkle());
        assert!(!decode("?sparkle=true%20").sparkle());
        assert!(!decode("?other=true").sparkle());
    }

    #[test]
    fn test_decode_message() {
        assert_eq!(decode("?message=%20%20").message(), DEFAULT_MESSAGE);
        assert_eq!(
            decode("?message=I%20love%20you%21").message(),
            "I love you!"
        );
        assert_eq!(decode("?message=see+you+soon").message(), "see you soon");
    }

    #[test]
    fn test_decode_music() {
        let music = "https://tonejs.github.io/examples/audio/casio/A2.mp3";
        let link = format!(
            "gift.html?flower=Daisy&music={}",
            url::form_urlencoded::byte_serialize(music.as_bytes()).collect::<String>()
        );

        assert_eq!(decode(&link).music(), Some(music));
        assert_eq!(decode("?music=").music(), None);
        assert_eq!(decode("?music=%FF").music(), None);
    }

    #[test]
    fn test_decode_first_occurrence_wins() {
        let descriptor = decode("?flower=Lily&flower=Tulip&theme=winter&theme=summer");

        assert_eq!(descriptor.flower(), FlowerKind::Lily);
        assert_eq!(descriptor.theme(), Theme::Winter);
    }

    #[test]
    fn test_decode_short_aliases() {
        let descriptor = decode("gift.html?m=Thank%20you&f=Sunflower&c=5&t=autumn&s=true");

        assert_eq!(descriptor.flower(), FlowerKind::Sunflower);
        assert_eq!(descriptor.message(), "Thank you");
        assert_eq!(descriptor.theme(), Theme::Autumn);
        assert_eq!(descriptor.required_interactions(), 5);
        assert!(descriptor.sparkle());

        let descriptor = decode("?f=Tulip&flower=Orchid&c=2&clicks=8");
        assert_eq!(descriptor.flower(), FlowerKind::Orchid);
        assert_eq!(descriptor.required_interactions(), 8);
    }

    #[test]
    fn test_decode_bare_query() {
        let descriptor = decode("flower=Tulip&clicks=6");

        assert_eq!(descriptor.flower(), FlowerKind::Tulip);
        assert_eq!(descriptor.required_interactions(), 6);
    }

    #[test]
    fn test_gift_page() {
        let expected = "https://example.github.io/Flower_gift/gift.html";

        for builder in [
            "https://example.github.io/Flower_gift/index.html",
            "https://example.github.io/Flower_gift/builder.html?x=1#top",
            "https://example.github.io/Flower_gift/",
        ] {
            let builder = Url::parse(builder).unwrap();
            assert_eq!(gift_page(&builder).as_str(), expected);
        }
    }

    #[test]
    fn test_stored_reference() {
        let entry_id = EntryId::new();
        let link = encode_stored(&entry_id, &base());

        assert_eq!(
            GiftReference::parse(link.as_str()),
            GiftReference::Stored(entry_id)
        );

        // A link that carries a gift is inline even when it also has an id
        let link = format!("{link}&flower=Tulip");
        assert!(matches!(
            GiftReference::parse(&link),
            GiftReference::Inline(d) if d.flower() == FlowerKind::Tulip
        ));

        // A message alone is enough
        let link = format!("?id={entry_id}&m=hi");
        assert!(matches!(
            GiftReference::parse(&link),
            GiftReference::Inline(d) if d.message() == "hi"
        ));

        assert_eq!(
            GiftReference::parse("?id=not-a-uuid"),
            GiftReference::Inline(GiftDescriptor::default())
        );
    }
}
