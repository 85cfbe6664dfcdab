//! Static Leaflet web map that renders `points.geojson`.
//!
//! Nothing per-record lives in these files; the script fetches the GeoJSON
//! at view time. Marker colors come from [`AccessLevel::color`].

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::MapView;
use crate::metrics::access::AccessLevel;

pub const INDEX_HTML: &str = "index.html";
pub const STYLES_CSS: &str = "styles.css";
pub const SCRIPT_JS: &str = "script.js";

const LEAFLET_VERSION: &str = "1.9.4";

pub fn index_html(view: &MapView) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>SDG 6 - Clean Water Map</title>
<link rel="stylesheet" href="https://unpkg.com/leaflet@{LEAFLET_VERSION}/dist/leaflet.css" />
<link rel="stylesheet" href="{STYLES_CSS}" />
</head>
<body>
<h2>{title}</h2>
<div id="map"></div>
<script src="https://unpkg.com/leaflet@{LEAFLET_VERSION}/dist/leaflet.js"></script>
<script src="{SCRIPT_JS}"></script>
</body>
</html>"#,
        title = escape_html(&view.title),
    )
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

pub fn styles_css() -> &'static str {
    "body {margin:0;font-family:Arial;}
h2 {background:#00796B;color:#fff;margin:0;padding:10px;text-align:center;}
#map {width:100%;height:95vh;}"
}

/// JS expression picking a marker color from `f.properties.AccessLevel`.
///
/// Unknown values fall through to the last level's color.
fn color_expression() -> String {
    let levels: &[AccessLevel] = &AccessLevel::ALL;

    let mut expr = String::new();
    for (idx, level) in levels.iter().enumerate() {
        if idx + 1 == levels.len() {
            expr.push_str(&format!("'{}'", level.color()));
        } else {
            expr.push_str(&format!(
                "f.properties.AccessLevel==='{}'?'{}':\n                ",
                level.as_str(),
                level.color()
            ));
        }
    }
    expr
}

pub fn script_js(view: &MapView, geojson_file: &str) -> String {
    let [lat, lon] = view.center;
    format!(
        r#"const map = L.map('map').setView([{lat}, {lon}], {zoom});
L.tileLayer('{tile_url}', {{maxZoom:{max_zoom}}}).addTo(map);
fetch('{geojson_file}').then(r=>r.json()).then(data=>{{
L.geoJSON(data,{{
 pointToLayer:(f,latlng)=>{{
   const color={color};
   return L.circleMarker(latlng,{{radius:6,fillColor:color,color:'#000',weight:0.5,fillOpacity:0.8}});
 }},
 onEachFeature:(f,layer)=>{{
   const p=f.properties;
   layer.bindPopup(`<b>${{p.Village}}</b><br>${{p.District}}, ${{p.State}}<br>${{p.PercentAccess}}% (${{p.AccessLevel}})`);
 }}
}}).addTo(map);
}});"#,
        zoom = view.zoom,
        tile_url = view.tile_url,
        max_zoom = view.max_zoom,
        color = color_expression(),
    )
}

/// Writes the page shell, stylesheet and script into `dir`, returning
/// the paths written.
pub fn write_bundle(dir: &Path, view: &MapView, geojson_file: &str) -> Result<Vec<PathBuf>> {
    let files = [
        (INDEX_HTML, index_html(view)),
        (STYLES_CSS, styles_css().to_string()),
        (SCRIPT_JS, script_js(view, geojson_file)),
    ];

    let mut written = Vec::with_capacity(files.len());
    for (name, content) in files {
        let path = dir.join(name);
        fs::write(&path, content).with_context(|| format!("failed to write {}", path.display()))?;
        debug!(path = %path.display(), "Web asset written");
        written.push(path);
    }

    Ok(written)
}
