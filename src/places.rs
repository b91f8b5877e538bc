//! Built-in landmark gazetteer used when no address provider is configured.
//!
//! Lookup order: exact name/alias → fuzzy (edit distance <= 2, and under a
//! third of the name's length; queries shorter than 4 chars never fuzz).
//! Autocomplete needs at least 3 chars and ranks prefix matches before
//! substring matches.

use crate::geo::Coordinate;
use serde::Serialize;

/// Shorter input gets no suggestions.
pub const MIN_AUTOCOMPLETE_CHARS: usize = 3;

const MIN_FUZZY_QUERY_CHARS: usize = 4;
const MAX_EDIT_DISTANCE: usize = 2;

/// A named demo location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Place {
    pub name: &'static str,
    #[serde(skip)]
    pub aliases: &'static [&'static str],
    #[serde(flatten)]
    pub coordinate: Coordinate,
}

struct Landmark {
    names: &'static [&'static str], // canonical + aliases, lowercase
    display: &'static str,
    lat: f64,
    lng: f64,
}

const LANDMARKS: &[Landmark] = &[
    Landmark {
        names: &["downtown plaza", "downtown"],
        display: "Downtown Plaza",
        lat: 40.7128, lng: -74.0060,
    },
    Landmark {
        names: &["central park"],
        display: "Central Park",
        lat: 40.7829, lng: -73.9654,
    },
    Landmark {
        names: &["brooklyn bridge"],
        display: "Brooklyn Bridge",
        lat: 40.7061, lng: -73.9969,
    },
    Landmark {
        names: &["times square", "times sq"],
        display: "Times Square",
        lat: 40.7580, lng: -73.9855,
    },
    Landmark {
        names: &["wall street", "wall st"],
        display: "Wall Street",
        lat: 40.7074, lng: -74.0113,
    },
    Landmark {
        names: &["statue of liberty", "liberty island"],
        display: "Statue of Liberty",
        lat: 40.6892, lng: -74.0445,
    },
    Landmark {
        names: &["empire state building", "empire state"],
        display: "Empire State Building",
        lat: 40.7484, lng: -73.9857,
    },
    Landmark {
        names: &["one world trade center", "world trade center", "wtc"],
        display: "One World Trade Center",
        lat: 40.7127, lng: -74.0134,
    },
];

fn to_place(l: &Landmark) -> Option<Place> {
    let coordinate = Coordinate::new(l.lat, l.lng).ok()?;
    Some(Place {
        name: l.display,
        aliases: l.names,
        coordinate,
    })
}

/// Every built-in landmark, in table order.
pub fn all() -> Vec<Place> {
    LANDMARKS.iter().filter_map(to_place).collect()
}

/// Compute edit distance between two strings (Levenshtein).
fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Resolve a landmark by name or alias, tolerating small typos.
pub fn lookup(query: &str) -> Option<Place> {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return None;
    }

    if let Some(l) = LANDMARKS.iter().find(|l| l.names.contains(&q.as_str())) {
        return to_place(l);
    }

    if q.chars().count() < MIN_FUZZY_QUERY_CHARS {
        return None;
    }

    let q = q.as_str();
    LANDMARKS
        .iter()
        .flat_map(|l| l.names.iter().map(move |n| (l, n.chars().count(), edit_distance(q, n))))
        .filter(|(_, len, dist)| *dist <= MAX_EDIT_DISTANCE && dist * 3 < *len)
        .map(|(l, _, dist)| (l, dist))
        .min_by_key(|(_, dist)| *dist)
        .and_then(|(l, _)| to_place(l))
}

/// Suggest landmarks for partially typed input.
pub fn autocomplete(input: &str, limit: usize) -> Vec<Place> {
    let q = input.trim().to_lowercase();
    if q.chars().count() < MIN_AUTOCOMPLETE_CHARS {
        return Vec::new();
    }

    let prefix = LANDMARKS
        .iter()
        .filter(|l| l.names.iter().any(|n| n.starts_with(&q)));
    let substring = LANDMARKS
        .iter()
        .filter(|l| !l.names.iter().any(|n| n.starts_with(&q)) && l.names.iter().any(|n| n.contains(&q)));

    prefix.chain(substring).filter_map(to_place).take(limit).collect()
}

/// Human-readable coordinates, e.g. `40.7128°N, 74.0060°W`.
pub fn format_coords(c: Coordinate) -> String {
    let ns = if c.latitude() >= 0.0 { 'N' } else { 'S' };
    let ew = if c.longitude() >= 0.0 { 'E' } else { 'W' };
    format!(
        "{:.4}\u{00B0}{}, {:.4}\u{00B0}{}",
        c.latitude().abs(),
        ns,
        c.longitude().abs(),
        ew
    )
}
