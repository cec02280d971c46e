use log::warn;
use web_sys::HtmlImageElement;

/// Brand logos used as food. Loaded asynchronously; a logo that is not ready
/// simply isn't drawn.
pub struct BrandSprites {
    images: Vec<Option<HtmlImageElement>>,
}

impl BrandSprites {
    pub fn load<'a>(urls: impl IntoIterator<Item = &'a str>) -> Self {
        let images = urls
            .into_iter()
            .map(|url| match HtmlImageElement::new() {
                Ok(img) => {
                    img.set_src(url);
                    Some(img)
                }
                Err(err) => {
                    warn!("cannot create image for {url}: {err:?}");
                    None
                }
            })
            .collect();
        Self { images }
    }

    /// The decoded image for `brand`, if it finished loading successfully.
    pub fn ready(&self, brand: usize) -> Option<&HtmlImageElement> {
        self.images
            .get(brand)?
            .as_ref()
            .filter(|img| img.complete() && img.natural_width() > 0)
    }
}
