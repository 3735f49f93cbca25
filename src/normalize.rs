//! Response normalization: extraction paths and documented defaults
//!
//! Each provider payload is reduced to the one or two fields the response
//! needs. Absence of an expected field is not an error; the caller pairs the
//! `None` with the documented default and the overall call still succeeds.

use crate::providers::geocoding::GeocodingHit;
use crate::providers::news::NewsPayload;
use crate::providers::weather::WeatherPayload;

/// Default display name when geocoding yields nothing usable
pub const DEFAULT_PLACE: &str = "a cool spot";

/// Default weather summary when description or temperature is absent
pub const DEFAULT_WEATHER: &str = "typical weather";

/// Default headline when no article matches
pub const DEFAULT_NEWS: &str = "nothing big today";

/// Default image URL when the article carries none
pub const DEFAULT_NEWS_IMAGE: &str = "";

/// First element's field, or `None` when the list is empty or the field absent
pub fn first_field<T, U>(items: &[T], field: impl Fn(&T) -> Option<U>) -> Option<U> {
    items.first().and_then(field)
}

/// Display name of the first geocoding hit
pub fn place_name(hits: &[GeocodingHit]) -> Option<String> {
    first_field(hits, |hit| hit.display_name.clone()).filter(|name| !name.trim().is_empty())
}

/// Weather summary in the `"{description}, {temp}°F"` shape. Both fields must
/// be present; temperature is rounded to the nearest integer.
pub fn weather_summary(payload: &WeatherPayload) -> Option<String> {
    let description = first_field(&payload.conditions, |condition| condition.description.clone())?;
    let temp = payload.main.as_ref().and_then(|main| main.temp)?;
    Some(format!("{description}, {}°F", temp.round()))
}

/// Headline text and image URL of the first article. Title is preferred,
/// description stands in when the title is absent; a missing image degrades to
/// the empty string rather than suppressing the headline.
pub fn headline(payload: &NewsPayload) -> Option<(String, String)> {
    let article = payload.articles.first()?;
    let text = article
        .title
        .clone()
        .or_else(|| article.description.clone())
        .filter(|text| !text.trim().is_empty())?;
    let image = article.url_to_image.clone().unwrap_or_default();
    Some((text, image))
}
