//! Completion handler.
//!
//! Offers the reserved words, every name in the workspace index, and the
//! requesting document's own declarations sorted ahead of everything else.

use lsp_types::{CompletionItem, CompletionItemKind, CompletionList, CompletionResponse};
use pua_syntax::{collect_symbols, SymbolKind, KEYWORDS};

use crate::db::SymbolIndex;

/// Handle a completion request for a document whose text is `source`.
pub fn handle_completion(source: &str, index: &SymbolIndex) -> CompletionResponse {
    let mut items: Vec<CompletionItem> = KEYWORDS
        .iter()
        .map(|kw| CompletionItem {
            label: (*kw).to_string(),
            kind: Some(CompletionItemKind::KEYWORD),
            ..Default::default()
        })
        .collect();

    items.extend(index.names().map(|(name, kind)| CompletionItem {
        label: name.to_string(),
        kind: Some(item_kind(kind)),
        ..Default::default()
    }));

    // Local declarations again, sorted first.
    items.extend(collect_symbols(source).into_iter().map(|symbol| CompletionItem {
        sort_text: Some(format!("0_{}", symbol.name)),
        kind: Some(item_kind(symbol.kind)),
        label: symbol.name,
        ..Default::default()
    }));

    CompletionResponse::List(CompletionList {
        is_incomplete: false,
        items,
    })
}

const fn item_kind(kind: SymbolKind) -> CompletionItemKind {
    match kind {
        SymbolKind::Function => CompletionItemKind::FUNCTION,
        SymbolKind::Variable => CompletionItemKind::VARIABLE,
    }
}
