use url::Url;

use crate::layer::{Layer, LayerId};
use crate::symbology::LayerStyle;

pub const DEFAULT_WMS_FORMAT: &str = "image/png";

/// Web Map Service imagery source.
///
/// Only the layer name varies between overlays; endpoint, format and
/// transparency follow the imagery-service convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WmsSource {
    pub url: String,
    pub layers: String,
    pub format: String,
    pub transparent: bool,
}

impl WmsSource {
    pub fn new(url: impl Into<String>, layers: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            layers: layers.into(),
            format: DEFAULT_WMS_FORMAT.to_string(),
            transparent: true,
        }
    }

    /// WMS 1.1.1 `GetMap` request for one geographic tile.
    ///
    /// `bbox_deg` is `[west, south, east, north]` in EPSG:4326 degrees.
    pub fn get_map_url(
        &self,
        bbox_deg: [f64; 4],
        width_px: u32,
        height_px: u32,
    ) -> Result<Url, url::ParseError> {
        let mut url = Url::parse(&self.url)?;
        let [w, s, e, n] = bbox_deg;
        url.query_pairs_mut()
            .append_pair("service", "WMS")
            .append_pair("version", "1.1.1")
            .append_pair("request", "GetMap")
            .append_pair("layers", &self.layers)
            .append_pair("styles", "")
            .append_pair("format", &self.format)
            .append_pair("transparent", if self.transparent { "true" } else { "false" })
            .append_pair("srs", "EPSG:4326")
            .append_pair("bbox", &format!("{w},{s},{e},{n}"))
            .append_pair("width", &width_px.to_string())
            .append_pair("height", &height_px.to_string());
        Ok(url)
    }
}

/// Remotely sourced raster overlay composited onto the globe.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterLayer {
    id: LayerId,
    pub style: LayerStyle,
    pub source: WmsSource,
}

impl RasterLayer {
    pub fn new(id: LayerId, source: WmsSource) -> Self {
        Self {
            id,
            style: LayerStyle::default(),
            source,
        }
    }
}

impl Layer for RasterLayer {
    fn id(&self) -> LayerId {
        self.id
    }

    fn is_visible(&self) -> bool {
        self.style.visible
    }
}

#[cfg(test)]
mod tests {
    use super::WmsSource;

    #[test]
    fn new_source_uses_transparent_png() {
        let src = WmsSource::new("http://localhost:8080/geoserver/wms", "Tur-Map:Tur_cities");
        assert_eq!(src.format, "image/png");
        assert!(src.transparent);
    }

    #[test]
    fn get_map_url_carries_wms_parameters() {
        let src = WmsSource::new("http://localhost:8080/geoserver/wms", "Tur-Map:Tur cities");
        let url = src
            .get_map_url([26.0, 36.0, 45.0, 42.0], 256, 256)
            .expect("valid endpoint");
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        assert!(pairs.contains(&("request".into(), "GetMap".into())));
        assert!(pairs.contains(&("layers".into(), "Tur-Map:Tur cities".into())));
        assert!(pairs.contains(&("bbox".into(), "26,36,45,42".into())));
        assert!(pairs.contains(&("transparent".into(), "true".into())));
        assert_eq!(url.path(), "/geoserver/wms");
    }

    #[test]
    fn get_map_url_rejects_relative_endpoint() {
        let src = WmsSource::new("geoserver/wms", "a");
        assert!(src.get_map_url([0.0, 0.0, 1.0, 1.0], 1, 1).is_err());
    }
}
