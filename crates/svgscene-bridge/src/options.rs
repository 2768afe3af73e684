// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use svgscene_tree::Size;
use url::Url;

/// Processing options.
#[derive(Clone, Debug)]
pub struct Options {
    /// The document URL.
    ///
    /// References like `xlink:href="other.svg#filter"` are resolved against it.
    /// Without it, only same-document references can be resolved.
    ///
    /// Default: `None`
    pub base_url: Option<Url>,

    /// Target DPI.
    ///
    /// Impacts units conversion.
    ///
    /// Default: 96.0
    pub dpi: f32,

    /// Default viewport size to assume if there is no `viewBox` attribute and
    /// the `width` or `height` attributes are relative.
    ///
    /// Default: `(100, 100)`
    pub default_size: Size,

    /// A CSS stylesheet that should be injected into the SVG. Can be used to overwrite
    /// certain attributes.
    ///
    /// Default: `None`
    pub style_sheet: Option<String>,
}

impl Default for Options {
    fn default() -> Options {
        Options {
            base_url: None,
            dpi: 96.0,
            default_size: Size::from_wh(100.0, 100.0).unwrap(),
            style_sheet: None,
        }
    }
}

impl Options {
    /// Returns the URL a parsed document will be identified by.
    ///
    /// Fallbacks to `about:blank` when `base_url` is not set.
    pub fn document_url(&self) -> Url {
        match self.base_url {
            Some(ref url) => url.clone(),
            // `unwrap` is safe, because the string is a valid URL.
            None => Url::parse("about:blank").unwrap(),
        }
    }
}
