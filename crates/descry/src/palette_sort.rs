//! Final palette ordering pass.

use log::debug;

use crate::structure::ElementTree;

/// Sorts every palette of the tree by tool name.
///
/// Elements are visited in structural post-order. Direct tools and each
/// section's tools are sorted with
/// [`compare_by_name`](descry_core::palette::compare_by_name): unnamed tools
/// first, then lexicographic. Only the order changes.
///
/// Must run after the resolution pass so tools added by callbacks are
/// included. Returns the number of palettes holding at least one tool.
pub fn sort_palettes(tree: &mut ElementTree) -> usize {
    let mut sorted = 0;
    for id in tree.postorder() {
        let palette = tree.palette_mut(id);
        if palette.tool_count() == 0 {
            continue;
        }
        palette.sort_tools();
        sorted += 1;
    }
    debug!(palettes = sorted; "Palettes sorted");
    sorted
}
