use super::resource::CatalogResource;

/// Base URL of the catalog API
pub const CATALOG_BASE_URL: &str = "https://api.music.apple.com";

/// A fully built catalog GET request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogRequest {
    url: String,
}

impl CatalogRequest {
    /// `/v1/catalog/{storefront}/{kind}/{id}[?l={lang}]`
    pub fn resource<R: CatalogResource>(storefront: &str, id: &str, lang: Option<&str>) -> Self {
        let mut url = format!(
            "{}/{}",
            collection_url::<R>(storefront),
            urlencoding::encode(id)
        );
        if let Some(lang) = lang {
            url.push_str(&format!("?l={}", urlencoding::encode(lang)));
        }
        Self { url }
    }

    /// `/v1/catalog/{storefront}/{kind}?ids={a,b}[&l={lang}]`
    pub fn resources<R: CatalogResource, S: AsRef<str>>(
        storefront: &str,
        ids: &[S],
        lang: Option<&str>,
    ) -> Self {
        let ids = ids
            .iter()
            .map(|id| urlencoding::encode(id.as_ref()).into_owned())
            .collect::<Vec<_>>()
            .join(",");

        let mut url = format!("{}?ids={}", collection_url::<R>(storefront), ids);
        if let Some(lang) = lang {
            url.push_str(&format!("&l={}", urlencoding::encode(lang)));
        }
        Self { url }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

fn collection_url<R: CatalogResource>(storefront: &str) -> String {
    if R::STOREFRONT_SCOPED {
        format!(
            "{}/v1/catalog/{}/{}",
            CATALOG_BASE_URL,
            urlencoding::encode(storefront),
            R::KIND
        )
    } else {
        format!("{}/v1/{}", CATALOG_BASE_URL, R::KIND)
    }
}
