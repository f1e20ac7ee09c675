//! Rewrite features into the canonical shape schema.

use geojson::{Feature, JsonObject, JsonValue};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::algorithm::{bounding_rect, geodesic_area};
use crate::error::{GeoShardError, Result};

/// Suffix of every per-shape output file.
pub const SHAPE_FILE_EXTENSION: &str = ".json";

/// The complete `properties` member of a normalized feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeProperties {
    pub name: String,
    /// Geodesic area in meters².
    pub area: f64,
    #[serde(rename = "type")]
    pub type_name: String,
}

impl From<ShapeProperties> for JsonObject {
    fn from(value: ShapeProperties) -> Self {
        let mut properties = JsonObject::new();
        properties.insert("name".to_string(), JsonValue::from(value.name));
        properties.insert("area".to_string(), JsonValue::from(value.area));
        properties.insert("type".to_string(), JsonValue::from(value.type_name));
        properties
    }
}

/// Output filename for a shape: spaces become underscores and `.json` is appended.
///
/// ```
/// use geoshard::normalize::feature_filename;
///
/// assert_eq!(feature_filename("Ross Island"), "Ross_Island.json");
/// ```
pub fn feature_filename(name: &str) -> String {
    format!("{}{SHAPE_FILE_EXTENSION}", name.replace(' ', "_"))
}

/// Rewrites features read from one input collection.
#[derive(Debug, Clone)]
pub struct FeatureNormalizer {
    name_property: String,
    type_name: String,
}

impl FeatureNormalizer {
    /// `name_property` is the input property holding the display name and `type_name` is
    /// stamped on every shape.
    pub fn new(name_property: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name_property: name_property.into(),
            type_name: type_name.into(),
        }
    }

    pub fn name_property(&self) -> &str {
        &self.name_property
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Read the display name of the feature at `position` in its collection.
    pub fn shape_name(&self, position: usize, feature: &Feature) -> Result<String> {
        let value = feature
            .properties
            .as_ref()
            .and_then(|properties| properties.get(&self.name_property))
            .ok_or_else(|| GeoShardError::MissingNameProperty {
                property: self.name_property.clone(),
                position,
            })?;
        match value {
            JsonValue::String(name) => Ok(name.clone()),
            _ => Err(GeoShardError::InvalidNameProperty {
                property: self.name_property.clone(),
                position,
            }),
        }
    }

    /// Assign the bounding box and replace all properties of `feature`, which is known as
    /// `name`.
    ///
    /// Nothing is modified if the geometry cannot be measured.
    pub fn apply(&self, name: String, feature: &mut Feature) -> Result<ShapeProperties> {
        let geometry = feature
            .geometry
            .as_ref()
            .ok_or_else(|| GeoShardError::malformed("feature has no geometry").in_shape(&name))?;
        let rect = bounding_rect(geometry).map_err(|err| err.in_shape(&name))?;
        let area = geodesic_area(geometry).map_err(|err| err.in_shape(&name))?;

        let properties = ShapeProperties {
            name,
            area,
            type_name: self.type_name.clone(),
        };
        debug!(
            name = %properties.name,
            area,
            filename = %feature_filename(&properties.name),
            "normalized shape"
        );

        feature.bbox = Some(rect.into());
        feature.properties = Some(properties.clone().into());
        Ok(properties)
    }

    /// [`shape_name`](Self::shape_name) followed by [`apply`](Self::apply).
    pub fn normalize(&self, position: usize, feature: &mut Feature) -> Result<ShapeProperties> {
        let name = self.shape_name(position, feature)?;
        self.apply(name, feature)
    }
}
