use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine};
use dotenvy::dotenv;
use plantguard_sdk::vision::{VisionModel, VisionModelOptions};
use std::env;

#[tokio::main]
async fn main() {
    dotenv().ok();

    let api_key = env::var("GEMINI_API_KEY").expect("GEMINI_API_KEY must be set");
    let path = env::args().nth(1).expect("usage: analyze <image-file>");

    let image_bytes = std::fs::read(&path).expect("failed to read image");
    let mime_type = if path.ends_with(".png") {
        "image/png"
    } else {
        "image/jpeg"
    };
    let data_url = format!("data:{mime_type};base64,{}", BASE64_STANDARD.encode(&image_bytes));

    let model = VisionModel::new(VisionModelOptions {
        api_key,
        ..Default::default()
    });

    let diagnosis = model.analyze(&data_url).await.expect("analysis failed");

    println!("{diagnosis:#?}");
}
