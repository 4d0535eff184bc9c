//! Go-to-definition handler.
//!
//! Resolves the identifier under the cursor through the workspace index,
//! preferring a declaration in the requesting document.

use lsp_types::{GotoDefinitionParams, GotoDefinitionResponse, Location};
use pua_syntax::text::word_at;

use super::utils::symbol_name_range;
use crate::db::SymbolIndex;
use crate::vfs::Document;

/// Handle a go-to-definition request.
///
/// A document that is not open behaves as empty text.
pub fn handle_goto_definition(
    params: &GotoDefinitionParams,
    document: Option<&Document>,
    index: &SymbolIndex,
) -> Option<GotoDefinitionResponse> {
    let uri = &params.text_document_position_params.text_document.uri;
    let position = params.text_document_position_params.position;

    let line = document?.line(position.line as usize)?;
    let (word, _, _) = word_at(&line, position.character as usize)?;

    tracing::debug!("Go-to-definition for word: {:?}", word);

    let entry = index.find_definition(word, uri)?;
    Some(GotoDefinitionResponse::Scalar(Location {
        uri: entry.uri.clone(),
        range: symbol_name_range(&entry.symbol),
    }))
}
