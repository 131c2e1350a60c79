use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct CreateTestimonialRequest {
    #[serde(default)]
    pub testimonial: Option<String>,
}
