/// Path markers that identify a product page across common storefront
/// platforms (Shopify, Magento, custom catalogs).
const PRODUCT_PATH_MARKERS: &[&str] = &[
    "/products/",
    "/p/",
    "/product-detail",
    "/productpage",
    "/item/",
    "/t/",
    "/buy",
    "/product/",
];

/// Markers that identify image and static-asset URLs
const IMAGE_MARKERS: &[&str] = &[
    ".jpg",
    ".jpeg",
    ".png",
    ".webp",
    "/cdn/",
    "cdn.",
    "assets.",
    "/image/",
    "asset.",
    "image.",
    "/static",
];

/// Non-catalog pages that never lead to products
const NON_CATALOG_PAGES: &[&str] = &[
    "/account",
    "/login",
    "/contact-us",
    "/contactus",
    "/cart",
    "/search",
    "/faq",
    "/faqs",
    "/about-us",
    "/terms-of-use",
    "/t-cs",
    "/tac",
    "/privacy-policy",
    "/privacypolicy",
    "/returns-exchange-policy",
    "/news",
    "/wishlist",
];

/// Returns true if the URL path looks like a product page
///
/// # Examples
///
/// ```
/// use storescout::url::is_product_url;
///
/// assert!(is_product_url("https://a.com/products/123"));
/// assert!(!is_product_url("https://a.com/about-us"));
/// ```
pub fn is_product_url(url: &str) -> bool {
    PRODUCT_PATH_MARKERS.iter().any(|marker| url.contains(marker))
}

/// Returns true if the URL points at an image or static asset
pub fn is_image_url(url: &str) -> bool {
    IMAGE_MARKERS.iter().any(|marker| url.contains(marker))
}

/// Returns true if the URL is worth traversing at all
///
/// A link is dropped when it is a pure in-page fragment (contains `#` but no
/// path segment), when it points at an image or asset, or when it matches the
/// non-catalog denylist.
pub fn is_useful_url(url: &str) -> bool {
    // Fragment-only anchors like "#MainContent" never lead anywhere new
    if url.contains('#') && !url.contains('/') {
        return false;
    }

    if is_image_url(url) {
        return false;
    }

    !NON_CATALOG_PAGES.iter().any(|page| url.contains(page))
}
