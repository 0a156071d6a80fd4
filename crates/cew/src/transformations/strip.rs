use cow_utils::CowUtils;

use crate::java_ast::Callable;

/// Javadoc tag documenting a checked exception
pub const THROWS_TAG: &str = "@throws";
/// Plain prose that replaces [`THROWS_TAG`]
pub const NO_LONGER_THROWS: &str = "no longer throws";

/// Drop the `throws` clause and turn `@throws` tags in the Javadoc into prose.
///
/// The replacement is a plain substring replacement confined to the
/// member's own Javadoc, so `@throws` inside prose is rewritten too.
pub fn strip_failure_clause<C: Callable>(member: &mut C) {
    member.throws_mut().clear();

    if let Some(doc) = member.doc_mut() {
        let rewritten = doc.content.cow_replace(THROWS_TAG, NO_LONGER_THROWS);
        doc.content = rewritten.into_owned();
    }
}
