use serde::{Deserialize, Serialize};

/// Generated map artifact, base64 encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapImage {
    pub mime_type: String,
    pub data: String,
}

impl MapImage {
    pub fn png(data: impl Into<String>) -> Self {
        Self {
            mime_type: "image/png".to_owned(),
            data: data.into(),
        }
    }

    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }

    pub fn from_data_url(url: &str) -> crate::Result<Self> {
        let Some((header, data)) = url
            .strip_prefix("data:")
            .and_then(|rest| rest.split_once(','))
        else {
            crate::validation!("map image must be a data URL");
        };

        let Some(mime_type) = header.strip_suffix(";base64") else {
            crate::validation!("map image must be base64 encoded");
        };

        Ok(Self {
            mime_type: mime_type.to_owned(),
            data: data.to_owned(),
        })
    }

    /// File extension matching the mime type.
    pub fn extension(&self) -> &str {
        match self.mime_type.as_str() {
            "image/jpeg" => "jpg",
            "image/webp" => "webp",
            _ => "png",
        }
    }
}

/// Click position on a map image, in image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapPoint {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}
