//! Document symbols handler for outline view.

use lsp_types::{DocumentSymbol, DocumentSymbolResponse, Position, Range, SymbolKind};
use pua_syntax::{collect_symbols, Symbol};

use super::utils::symbol_name_range;

/// Right edge of a symbol's full range; clients clamp it to the line.
const LINE_END: u32 = 10_000;

/// Handle a document symbols request.
///
/// Always answers with a (possibly empty) flat list in declaration order.
pub fn handle_document_symbols(source: &str) -> DocumentSymbolResponse {
    let symbols = collect_symbols(source).iter().map(to_document_symbol).collect();
    DocumentSymbolResponse::Nested(symbols)
}

#[allow(deprecated)] // DocumentSymbol::deprecated field is deprecated but required
fn to_document_symbol(symbol: &Symbol) -> DocumentSymbol {
    let kind = match symbol.kind {
        pua_syntax::SymbolKind::Function => SymbolKind::FUNCTION,
        pua_syntax::SymbolKind::Variable => SymbolKind::VARIABLE,
    };

    DocumentSymbol {
        name: symbol.name.clone(),
        detail: None,
        kind,
        tags: None,
        deprecated: None,
        range: Range {
            start: Position::new(symbol.line, 0),
            end: Position::new(symbol.line, LINE_END),
        },
        selection_range: symbol_name_range(symbol),
        children: None,
    }
}
