//! Font resource location and the per-document font map table.
//!
//! [`locate_fonts`] walks each page dictionary along the configured
//! [`FontPath`] (by default `Resources/Font/*`), falling back to the page's
//! `/Parent` chain when the page itself has no matches, and builds one
//! [`CharacterMap`] per font resource found.

use std::collections::{HashMap, HashSet};

use lopdf::{Document, Object, ObjectId};
use pdfscribe_core::{ExtractOptions, ExtractWarning, ExtractWarningCode, KeyPattern};

use crate::cmap::CharacterMap;
use crate::error::BackendError;
use crate::handler::TextHandler;
use crate::lopdf_backend::{as_dictionary, decode_stream, resolve_ref};

/// Character maps keyed by font resource name (without the leading `/`).
///
/// Inserting a map for a name that is already present replaces it, so when
/// several pages declare the same resource name the last page wins.
#[derive(Debug, Clone, Default)]
pub struct FontMaps {
    maps: HashMap<String, CharacterMap>,
}

impl FontMaps {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `map` under its own name, returning the map it replaced.
    pub fn insert(&mut self, map: CharacterMap) -> Option<CharacterMap> {
        self.maps.insert(map.name().to_string(), map)
    }

    /// Look up a map by font resource name.
    pub fn get(&self, name: &str) -> Option<&CharacterMap> {
        self.maps.get(name)
    }

    /// Returns true if a map exists for `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.maps.contains_key(name)
    }

    /// Number of maps.
    pub fn len(&self) -> usize {
        self.maps.len()
    }

    /// Returns true if no fonts were found.
    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }

    /// Iterate over the maps in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &CharacterMap> {
        self.maps.values()
    }
}

impl FromIterator<CharacterMap> for FontMaps {
    fn from_iter<I: IntoIterator<Item = CharacterMap>>(iter: I) -> Self {
        let mut maps = Self::new();
        maps.extend(iter);
        maps
    }
}

impl Extend<CharacterMap> for FontMaps {
    fn extend<I: IntoIterator<Item = CharacterMap>>(&mut self, iter: I) {
        for map in iter {
            self.insert(map);
        }
    }
}

/// Build a [`FontMaps`] table from every page's font resources.
///
/// Pages are visited in page order, at most `options.max_pages` of them.
/// A font whose `/ToUnicode` stream cannot be decoded gets an empty map and
/// a [`ExtractWarningCode::MalformedObject`] warning.
pub fn locate_fonts(
    doc: &Document,
    options: &ExtractOptions,
    handler: &mut dyn TextHandler,
) -> FontMaps {
    let pages = doc.get_pages();
    let limit = options.max_pages.unwrap_or(usize::MAX);
    if pages.len() > limit {
        handler.on_warning(ExtractWarning::with_code(
            ExtractWarningCode::ResourceLimitReached,
            format!(
                "font search limited to {limit} of {} pages (max_pages)",
                pages.len()
            ),
        ));
    }

    let mut maps = FontMaps::new();
    for (page_index, &page_id) in pages.values().take(limit).enumerate() {
        for (name, font) in page_fonts(doc, page_id, options.font_path.segments()) {
            let map = match character_map_for_font(doc, &name, font) {
                Ok(map) => map,
                Err(err) => {
                    handler.on_warning(
                        ExtractWarning::with_code(
                            ExtractWarningCode::MalformedObject,
                            format!("unreadable ToUnicode stream, {err}"),
                        )
                        .on_page(page_index)
                        .with_font(name.as_str()),
                    );
                    CharacterMap::empty(name.as_str())
                }
            };
            if maps.insert(map).is_some() {
                tracing::debug!(font = %name, page = page_index, "font resource redefined");
            }
        }
    }
    tracing::debug!(fonts = maps.len(), "located font resources");
    maps
}

/// Font resources reachable from a page along `path`.
///
/// When the page dictionary yields nothing, each `/Parent` is tried in turn
/// so inherited resources are found.
pub fn page_fonts<'a>(
    doc: &'a Document,
    page_id: ObjectId,
    path: &[KeyPattern],
) -> Vec<(String, &'a Object)> {
    let mut visited = HashSet::new();
    let mut current = Some(page_id);
    while let Some(id) = current {
        if !visited.insert(id) {
            break;
        }
        let Ok(node) = doc.get_object(id) else {
            tracing::debug!(?id, "dangling page tree reference");
            break;
        };
        let found = match_path(doc, node, path);
        if !found.is_empty() {
            return found;
        }
        current = as_dictionary(node)
            .and_then(|dict| dict.get(b"Parent").ok())
            .and_then(|parent| parent.as_reference().ok());
    }
    Vec::new()
}

/// Constrained depth-first search: at depth `n` only keys matching
/// `path[n]` are followed. Matches at the last segment are returned in key
/// order.
fn match_path<'a>(
    doc: &'a Document,
    root: &'a Object,
    path: &[KeyPattern],
) -> Vec<(String, &'a Object)> {
    let mut found = Vec::new();
    if path.is_empty() {
        return found;
    }

    let mut stack = vec![(root, 0usize)];
    while let Some((node, depth)) = stack.pop() {
        let Some(dict) = as_dictionary(resolve_ref(doc, node)) else {
            continue;
        };
        let pattern = &path[depth];
        let mut children = Vec::new();
        for (key, value) in dict.iter() {
            let key = String::from_utf8_lossy(key);
            if !pattern.matches(&key) {
                continue;
            }
            if depth + 1 == path.len() {
                found.push((key.into_owned(), resolve_ref(doc, value)));
            } else {
                children.push((value, depth + 1));
            }
        }
        stack.extend(children.into_iter().rev());
    }
    found
}

/// Build the [`CharacterMap`] for one font resource.
///
/// A font without a `/ToUnicode` stream yields an empty map. Only a
/// `/ToUnicode` stream that fails to decompress is an error.
pub fn character_map_for_font(
    doc: &Document,
    name: &str,
    font: &Object,
) -> Result<CharacterMap, BackendError> {
    let name = name.strip_prefix('/').unwrap_or(name);
    let to_unicode = as_dictionary(resolve_ref(doc, font))
        .and_then(|dict| dict.get(b"ToUnicode").ok())
        .map(|obj| resolve_ref(doc, obj));

    match to_unicode {
        Some(Object::Stream(stream)) => {
            let data = decode_stream(stream).map_err(|err| BackendError::Font {
                font: name.to_string(),
                reason: err.to_string(),
            })?;
            let map = CharacterMap::parse(name, &data);
            tracing::debug!(
                font = name,
                ranges = map.bf_ranges().len(),
                chars = map.bf_char_count(),
                skipped = map.skipped_rows(),
                "parsed ToUnicode CMap"
            );
            Ok(map)
        }
        _ => Ok(CharacterMap::empty(name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::CollectingHandler;
    use crate::lopdf_backend::fixtures::{IDENTITY_CMAP, add_font, add_pages};
    use lopdf::{Stream, dictionary};
    use pdfscribe_core::FontPath;

    const CMAP_A_TO_Z: &[u8] = b"1 begincodespacerange\n<0000> <FFFF>\nendcodespacerange\n\
        1 beginbfchar\n<0001> <005A>\nendbfchar\n";

    fn locate(doc: &Document, options: &ExtractOptions) -> (FontMaps, CollectingHandler) {
        let mut handler = CollectingHandler::default();
        let maps = locate_fonts(doc, options, &mut handler);
        (maps, handler)
    }

    #[test]
    fn page_with_two_fonts_yields_two_maps() {
        let mut doc = Document::with_version("1.5");
        let f1 = add_font(&mut doc, "Alpha", Some(IDENTITY_CMAP));
        let f9 = add_font(&mut doc, "Beta", Some(CMAP_A_TO_Z));
        add_pages(&mut doc, vec![(b"", vec![("F1", f1), ("F9", f9)])]);

        let (maps, handler) = locate(&doc, &ExtractOptions::default());
        assert_eq!(maps.len(), 2);
        assert_eq!(maps.get("F1").and_then(|m| m.resolve(0x0041)).as_deref(), Some("A"));
        assert_eq!(maps.get("F9").and_then(|m| m.resolve(0x0001)).as_deref(), Some("Z"));
        assert!(handler.warnings.is_empty());
    }

    #[test]
    fn font_without_to_unicode_gets_empty_map() {
        let mut doc = Document::with_version("1.5");
        let f1 = add_font(&mut doc, "Plain", None);
        add_pages(&mut doc, vec![(b"", vec![("F1", f1)])]);

        let (maps, _) = locate(&doc, &ExtractOptions::default());
        let map = maps.get("F1").unwrap();
        assert!(map.is_empty());
        assert_eq!(map.name(), "F1");
    }

    #[test]
    fn same_name_on_later_page_wins() {
        let mut doc = Document::with_version("1.5");
        let first = add_font(&mut doc, "First", Some(IDENTITY_CMAP));
        let second = add_font(&mut doc, "Second", Some(CMAP_A_TO_Z));
        add_pages(
            &mut doc,
            vec![(b"", vec![("F1", first)]), (b"", vec![("F1", second)])],
        );

        let (maps, _) = locate(&doc, &ExtractOptions::default());
        assert_eq!(maps.len(), 1);
        let map = maps.get("F1").unwrap();
        assert_eq!(map.resolve(0x0001).as_deref(), Some("Z"));
        assert_eq!(map.resolve(0x0041), None);
    }

    #[test]
    fn inherited_resources_found_through_parent() {
        let mut doc = Document::with_version("1.5");
        let f1 = add_font(&mut doc, "Inherited", Some(IDENTITY_CMAP));
        let pages = add_pages(&mut doc, vec![(b"", vec![])]);

        // Move the resources from the page onto the page tree node.
        let page = doc.get_object_mut(pages[0]).unwrap().as_dict_mut().unwrap();
        page.remove(b"Resources");
        let parent_id = page.get(b"Parent").unwrap().as_reference().unwrap();
        doc.get_object_mut(parent_id)
            .unwrap()
            .as_dict_mut()
            .unwrap()
            .set("Resources", dictionary! { "Font" => dictionary! { "F1" => f1 } });

        let (maps, _) = locate(&doc, &ExtractOptions::default());
        assert!(maps.contains("F1"));
    }

    #[test]
    fn font_dictionary_behind_reference_is_followed() {
        let mut doc = Document::with_version("1.5");
        let f1 = add_font(&mut doc, "Alpha", Some(IDENTITY_CMAP));
        let font_dict = doc.add_object(dictionary! { "F1" => f1 });
        let resources = doc.add_object(dictionary! { "Font" => font_dict });
        let pages = add_pages(&mut doc, vec![(b"", vec![])]);
        doc.get_object_mut(pages[0])
            .unwrap()
            .as_dict_mut()
            .unwrap()
            .set("Resources", resources);

        let (maps, _) = locate(&doc, &ExtractOptions::default());
        assert!(maps.get("F1").is_some_and(|m| !m.is_empty()));
    }

    #[test]
    fn wildcard_segment_filters_keys() {
        let mut doc = Document::with_version("1.5");
        let f1 = add_font(&mut doc, "Alpha", None);
        let tt = add_font(&mut doc, "Beta", None);
        add_pages(&mut doc, vec![(b"", vec![("F1", f1), ("TT2", tt)])]);

        let options = ExtractOptions {
            font_path: "Resources/Font/F*".parse().unwrap(),
            ..ExtractOptions::default()
        };
        let (maps, _) = locate(&doc, &options);
        assert!(maps.contains("F1"));
        assert!(!maps.contains("TT2"));
    }

    #[test]
    fn max_pages_limits_search() {
        let mut doc = Document::with_version("1.5");
        let f1 = add_font(&mut doc, "Alpha", None);
        let f2 = add_font(&mut doc, "Beta", None);
        add_pages(
            &mut doc,
            vec![(b"", vec![("F1", f1)]), (b"", vec![("F2", f2)])],
        );

        let options = ExtractOptions {
            max_pages: Some(1),
            ..ExtractOptions::default()
        };
        let (maps, handler) = locate(&doc, &options);
        assert!(maps.contains("F1"));
        assert!(!maps.contains("F2"));
        assert_eq!(handler.warnings.len(), 1);
        assert_eq!(
            handler.warnings[0].code,
            ExtractWarningCode::ResourceLimitReached
        );
    }

    #[test]
    fn undecodable_to_unicode_warns_and_maps_empty() {
        let mut doc = Document::with_version("1.5");
        let broken = doc.add_object(Stream::new(
            dictionary! { "Filter" => "UnknownDecode" },
            b"garbage".to_vec(),
        ));
        let f1 = doc.add_object(dictionary! {
            "Type" => "Font",
            "ToUnicode" => broken,
        });
        add_pages(&mut doc, vec![(b"", vec![("F1", f1)])]);

        let (maps, handler) = locate(&doc, &ExtractOptions::default());
        assert!(maps.get("F1").is_some_and(CharacterMap::is_empty));
        assert_eq!(handler.warnings.len(), 1);
        assert_eq!(handler.warnings[0].code, ExtractWarningCode::MalformedObject);
        assert_eq!(handler.warnings[0].font_name.as_deref(), Some("F1"));
    }

    #[test]
    fn undecodable_to_unicode_is_a_font_error() {
        let mut doc = Document::with_version("1.5");
        let broken = doc.add_object(Stream::new(
            dictionary! { "Filter" => "UnknownDecode" },
            b"garbage".to_vec(),
        ));
        let font = doc.add_object(dictionary! { "ToUnicode" => broken });
        let err = character_map_for_font(&doc, "/F2", &Object::Reference(font)).unwrap_err();
        match err {
            BackendError::Font { font, reason } => {
                assert_eq!(font, "F2");
                assert!(reason.starts_with("cannot decode stream"));
            }
            other => panic!("expected a font error, got {other:?}"),
        }
    }

    #[test]
    fn empty_path_matches_nothing() {
        let mut doc = Document::with_version("1.5");
        let f1 = add_font(&mut doc, "Alpha", None);
        let pages = add_pages(&mut doc, vec![(b"", vec![("F1", f1)])]);
        let path = FontPath::new(Vec::<String>::new());
        assert!(page_fonts(&doc, pages[0], path.segments()).is_empty());
    }

    #[test]
    fn character_map_for_font_strips_slash() {
        let mut doc = Document::with_version("1.5");
        let f1 = add_font(&mut doc, "Alpha", Some(IDENTITY_CMAP));
        let map = character_map_for_font(&doc, "/F1", &Object::Reference(f1)).unwrap();
        assert_eq!(map.name(), "F1");
        assert_eq!(map.resolve(0x0042).as_deref(), Some("B"));
    }

    #[test]
    fn font_maps_collects_last_wins() {
        let maps: FontMaps = [
            CharacterMap::parse("F1", IDENTITY_CMAP),
            CharacterMap::empty("F1"),
        ]
        .into_iter()
        .collect();
        assert_eq!(maps.len(), 1);
        assert!(maps.get("F1").is_some_and(CharacterMap::is_empty));
        assert_eq!(maps.iter().count(), 1);
    }
}
