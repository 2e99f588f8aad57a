use serde::{Deserialize, Serialize};

pub const IMAGE_SIZE: u32 = 1024;
pub const CFG_SCALE: f64 = 8.0;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TitanImageRequest {
    pub task_type: &'static str,
    pub text_to_image_params: TitanTextToImageParams,
    pub image_generation_config: TitanImageConfig,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TitanTextToImageParams {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negative_text: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TitanImageConfig {
    pub number_of_images: u32,
    pub height: u32,
    pub width: u32,
    pub cfg_scale: f64,
}

impl TitanImageRequest {
    pub fn text_to_image(prompt: impl Into<String>) -> Self {
        Self {
            task_type: "TEXT_IMAGE",
            text_to_image_params: TitanTextToImageParams {
                text: prompt.into(),
                negative_text: None,
            },
            image_generation_config: TitanImageConfig {
                number_of_images: 1,
                height: IMAGE_SIZE,
                width: IMAGE_SIZE,
                cfg_scale: CFG_SCALE,
            },
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TitanImageResponse {
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OpenAiImageRequest {
    pub model: String,
    pub prompt: String,
    pub size: &'static str,
    pub n: u32,
}

impl OpenAiImageRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            size: "1024x1024",
            n: 1,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct OpenAiImageResponse {
    #[serde(default)]
    pub data: Vec<OpenAiImageData>,
}

#[derive(Debug, Deserialize)]
pub struct OpenAiImageData {
    #[serde(default)]
    pub url: Option<String>,
}
