use std::collections::HashSet;

use super::dto::Poi;

pub const OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";

/// Around-radius query over the amenity/shop tags commonly used for POIs.
pub fn poi_query(lat: f64, lon: f64, radius: u32, types: &str) -> String {
    format!(
        "[out:json][timeout:25];(\
         node[\"amenity\"~\"{types}\"](around:{radius},{lat},{lon});\
         way[\"amenity\"~\"{types}\"](around:{radius},{lat},{lon});\
         relation[\"amenity\"~\"{types}\"](around:{radius},{lat},{lon});\
         node[\"shop\"~\"{types}\"](around:{radius},{lat},{lon});\
         way[\"shop\"~\"{types}\"](around:{radius},{lat},{lon});\
         relation[\"shop\"~\"{types}\"](around:{radius},{lat},{lon});\
         );out center;"
    )
}

pub fn tourism_country_query(country: &str, limit: usize) -> String {
    format!(
        "[out:json][timeout:60];area[name=\"{country}\"][admin_level=2]->.searchArea;(\
         node[\"tourism\"](area.searchArea);\
         way[\"tourism\"](area.searchArea);\
         relation[\"tourism\"](area.searchArea);\
         );out center {limit};"
    )
}

pub fn tourism_bbox_query(bbox: (f64, f64, f64, f64), limit: usize) -> String {
    let (minlat, minlon, maxlat, maxlon) = bbox;
    format!(
        "[out:json][timeout:60];(\
         node[\"tourism\"]({minlat},{minlon},{maxlat},{maxlon});\
         way[\"tourism\"]({minlat},{minlon},{maxlat},{maxlon});\
         relation[\"tourism\"]({minlat},{minlon},{maxlat},{maxlon});\
         );out center {limit};"
    )
}

pub fn parse_bbox(bbox: &str) -> Option<(f64, f64, f64, f64)> {
    let parts: Vec<f64> = bbox
        .split(',')
        .map(|p| p.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .ok()?;
    match parts.as_slice() {
        [a, b, c, d] => Some((*a, *b, *c, *d)),
        _ => None,
    }
}

/// Flattens an Overpass response into [`Poi`]s, de-duplicated by
/// (osm_type, id). Nodes carry lat/lon directly; ways and relations use their
/// computed center. Elements without coordinates are dropped.
pub fn simplify_elements(data: &serde_json::Value, prefer_tourism: bool) -> Vec<Poi> {
    let mut seen: HashSet<(String, i64)> = HashSet::new();
    let mut pois = Vec::new();

    let elements = match data.get("elements").and_then(|e| e.as_array()) {
        Some(elements) => elements,
        None => return pois,
    };

    for el in elements {
        let osm_type = el.get("type").and_then(|t| t.as_str()).unwrap_or("node");
        let id = el.get("id").and_then(|i| i.as_i64()).unwrap_or(0);
        if !seen.insert((osm_type.to_string(), id)) {
            continue;
        }

        let empty = serde_json::json!({});
        let tags = el.get("tags").unwrap_or(&empty);
        let tag = |key: &str| tags.get(key).and_then(|v| v.as_str());

        let name = tag("name")
            .or_else(|| tag("operator"))
            .or_else(|| tag("brand"))
            .unwrap_or("Unknown")
            .trim()
            .to_string();

        let (lat, lon) = if osm_type == "node" {
            (
                el.get("lat").and_then(|v| v.as_f64()),
                el.get("lon").and_then(|v| v.as_f64()),
            )
        } else {
            let center = el.get("center");
            (
                center.and_then(|c| c.get("lat")).and_then(|v| v.as_f64()),
                center.and_then(|c| c.get("lon")).and_then(|v| v.as_f64()),
            )
        };
        let (Some(latitude), Some(longitude)) = (lat, lon) else {
            continue;
        };

        let poi_type = if prefer_tourism {
            tag("tourism").or_else(|| tag("amenity")).unwrap_or("tourist_spot")
        } else {
            tag("amenity")
                .or_else(|| tag("shop"))
                .or_else(|| tag("tourism"))
                .unwrap_or("unknown")
        };

        pois.push(Poi {
            id,
            osm_type: osm_type.to_string(),
            name,
            poi_type: poi_type.to_string(),
            latitude,
            longitude,
            tags: tags.clone(),
        });
    }

    pois
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn poi_query_embeds_parameters() {
        let q = poi_query(27.7, 85.3, 1500, "restaurant|cafe");
        assert!(q.contains("around:1500,27.7,85.3"));
        assert!(q.contains("\"amenity\"~\"restaurant|cafe\""));
        assert!(q.contains("\"shop\"~\"restaurant|cafe\""));
        assert!(q.ends_with("out center;"));
    }

    #[test]
    fn bbox_parsing() {
        assert_eq!(
            parse_bbox("26.3,80.0,30.4,88.2"),
            Some((26.3, 80.0, 30.4, 88.2))
        );
        assert_eq!(parse_bbox("26.3, 80.0, 30.4, 88.2"), Some((26.3, 80.0, 30.4, 88.2)));
        assert_eq!(parse_bbox("26.3,80.0"), None);
        assert_eq!(parse_bbox("not,numbers,at,all"), None);
    }

    #[test]
    fn nodes_use_direct_coordinates_ways_use_center() {
        let data = json!({
            "elements": [
                {"type": "node", "id": 1, "lat": 27.7, "lon": 85.3,
                 "tags": {"amenity": "restaurant", "name": "Thakali Kitchen"}},
                {"type": "way", "id": 2, "center": {"lat": 28.2, "lon": 83.9},
                 "tags": {"amenity": "cafe", "name": "Lakeside Cafe"}},
            ]
        });
        let pois = simplify_elements(&data, false);
        assert_eq!(pois.len(), 2);
        assert_eq!(pois[0].latitude, 27.7);
        assert_eq!(pois[1].latitude, 28.2);
        assert_eq!(pois[1].osm_type, "way");
    }

    #[test]
    fn elements_without_coordinates_are_dropped() {
        let data = json!({
            "elements": [
                {"type": "way", "id": 3, "tags": {"amenity": "atm"}},
            ]
        });
        assert!(simplify_elements(&data, false).is_empty());
    }

    #[test]
    fn duplicates_are_removed_by_type_and_id() {
        let data = json!({
            "elements": [
                {"type": "node", "id": 7, "lat": 1.0, "lon": 2.0, "tags": {"name": "A"}},
                {"type": "node", "id": 7, "lat": 1.0, "lon": 2.0, "tags": {"name": "A"}},
                {"type": "way", "id": 7, "center": {"lat": 1.0, "lon": 2.0}, "tags": {"name": "B"}},
            ]
        });
        assert_eq!(simplify_elements(&data, false).len(), 2);
    }

    #[test]
    fn name_falls_back_to_operator_then_brand() {
        let data = json!({
            "elements": [
                {"type": "node", "id": 1, "lat": 1.0, "lon": 2.0, "tags": {"operator": "NIC Asia"}},
                {"type": "node", "id": 2, "lat": 1.0, "lon": 2.0, "tags": {"brand": "Himalayan Java"}},
                {"type": "node", "id": 3, "lat": 1.0, "lon": 2.0, "tags": {}},
            ]
        });
        let pois = simplify_elements(&data, false);
        assert_eq!(pois[0].name, "NIC Asia");
        assert_eq!(pois[1].name, "Himalayan Java");
        assert_eq!(pois[2].name, "Unknown");
    }

    #[test]
    fn tourism_mode_prefers_tourism_tag() {
        let data = json!({
            "elements": [
                {"type": "node", "id": 1, "lat": 1.0, "lon": 2.0,
                 "tags": {"tourism": "viewpoint", "amenity": "parking"}},
                {"type": "node", "id": 2, "lat": 1.0, "lon": 2.0, "tags": {}},
            ]
        });
        let pois = simplify_elements(&data, true);
        assert_eq!(pois[0].poi_type, "viewpoint");
        assert_eq!(pois[1].poi_type, "tourist_spot");
    }
}
