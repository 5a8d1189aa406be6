//! Image path relocation and attribute clean-up.

use std::ffi::OsStr;
use std::path::Path;

use phf::phf_set;
use texdocx_ast::{Attr, Filter, FilterReturn, Inline, Target};
use tracing::debug;

use super::Pass;
use crate::context::FilterContext;
use crate::utils::error::{FilterWarning, WarningKind};

/// Extensions (lowercase) word processors cannot embed.
static UNSUPPORTED_EXTENSIONS: phf::Set<&'static str> = phf_set! {
    "pdf",
    "eps",
    "ps",
};

/// Prefixes image paths, drops explicit widths, flags vector sources.
pub struct AdjustImages;

impl Filter<FilterContext> for AdjustImages {
    fn inline(&mut self, mut inline: Inline, cx: &mut FilterContext) -> FilterReturn<Inline> {
        if let Inline::Image(attr, _, target) = &mut inline {
            adjust_image(attr, target, cx);
        }
        FilterReturn::Unchanged(inline)
    }
}

impl Pass for AdjustImages {
    fn name(&self) -> &'static str {
        "image-adjustment"
    }
}

fn adjust_image(attr: &mut Attr, target: &mut Target, cx: &mut FilterContext) {
    target.url.insert_str(0, &cx.options.image_prefix);
    // LaTeX widths are relative to \textwidth and come out wrong in Word
    if let Some(width) = attr.remove("width") {
        debug!(url = %target.url, %width, "dropped image width");
    }

    if let Some(extension) = unsupported_extension(&target.url) {
        let message = format!(
            "{} images are not supported in the output; convert to PNG or JPEG first",
            extension.to_ascii_uppercase()
        );
        cx.warn(
            FilterWarning::new(WarningKind::UnsupportedImage, message)
                .with_location(target.url.clone()),
        );
    }
}

fn unsupported_extension(url: &str) -> Option<String> {
    let extension = Path::new(url)
        .extension()
        .and_then(OsStr::to_str)?
        .to_ascii_lowercase();
    UNSUPPORTED_EXTENSIONS
        .contains(extension.as_str())
        .then_some(extension)
}
