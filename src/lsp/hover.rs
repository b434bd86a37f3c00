//! Markdown rendering for the hover popup

use crate::packagist::metadata::PackageMetadata;

/// Render package metadata as the Markdown shown on hover.
/// The composer commands sit in a code block so hosts offer them as
/// copyable text.
pub fn render_hover(metadata: &PackageMetadata) -> String {
    format!(
        "## {name}\n\n\
         {description}\n\n\
         - Stats: DL {downloads} / Fav {favers}\n\
         - Page: [Packagist]({packagist_url}) / [Repository]({repository})\n\n\
         ```sh\n\
         {require_command}\n\
         {remove_command}\n\
         ```\n",
        name = metadata.name,
        description = metadata.description,
        downloads = metadata.downloads_total,
        favers = metadata.favers,
        packagist_url = metadata.packagist_url(),
        repository = metadata.repository,
        require_command = metadata.require_command(),
        remove_command = metadata.remove_command(),
    )
}
