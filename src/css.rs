//! Selector to declaration lookup built from a document's inline stylesheets.
//!
//! Exported documents style runs of text through generated classes
//! (`.c7{font-weight:700}`), so the normalizer needs to see what a class
//! means before it strips it. Selectors and declaration bodies are kept as
//! trimmed source text.

use std::collections::HashMap;

use cssparser::{
    AtRuleParser, ParseError, Parser, ParserInput, ParserState, QualifiedRuleParser,
    StyleSheetParser,
};

use crate::dom::{ArenaDom, NodeKind};

/// Read-only map from selector text to declaration text.
#[derive(Debug, Default, Clone)]
pub struct CssRuleMap {
    rules: HashMap<String, String>,
}

impl CssRuleMap {
    /// Parse stylesheet text. Later rules with the same selector win.
    pub fn parse(css: &str) -> Self {
        let mut input = ParserInput::new(css);
        let mut parser = Parser::new(&mut input);
        let mut rules = HashMap::new();

        let mut rule_parser = RuleMapParser { rules: &mut rules };
        let stylesheet_parser = StyleSheetParser::new(&mut parser, &mut rule_parser);

        for result in stylesheet_parser {
            // Lenient: at-rules and broken rules are skipped
            let _ = result;
        }

        Self { rules }
    }

    /// Build the map from every `<style>` element in the document.
    pub fn from_document(dom: &ArenaDom) -> Self {
        let css: String = dom
            .descendants(dom.document())
            .into_iter()
            .filter(|&id| NodeKind::of(dom, id) == NodeKind::Style)
            .map(|id| dom.text(id))
            .collect();
        Self::parse(&css)
    }

    /// Declarations for an exact selector.
    pub fn get(&self, selector: &str) -> Option<&str> {
        self.rules.get(selector).map(String::as_str)
    }

    /// Declarations for the class selector `.{class}`.
    pub fn lookup_class(&self, class: &str) -> Option<&str> {
        self.get(&format!(".{class}"))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

struct RuleMapParser<'a> {
    rules: &'a mut HashMap<String, String>,
}

/// Consume the rest of `input` and return its source text, trimmed.
fn remaining_source<'i>(input: &mut Parser<'i, '_>) -> String {
    let start = input.position();
    while input.next_including_whitespace_and_comments().is_ok() {}
    input.slice_from(start).trim().to_string()
}

impl<'i> AtRuleParser<'i> for RuleMapParser<'_> {
    type Prelude = ();
    type AtRule = ();
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        _name: cssparser::CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        Err(input.new_custom_error(()))
    }

    fn parse_block<'t>(
        &mut self,
        _prelude: Self::Prelude,
        _start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::AtRule, ParseError<'i, Self::Error>> {
        Err(input.new_custom_error(()))
    }
}

impl<'i> QualifiedRuleParser<'i> for RuleMapParser<'_> {
    type Prelude = String;
    type QualifiedRule = ();
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        let selector = remaining_source(input);
        if selector.is_empty() {
            return Err(input.new_custom_error(()));
        }
        Ok(selector)
    }

    fn parse_block<'t>(
        &mut self,
        prelude: Self::Prelude,
        _start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::QualifiedRule, ParseError<'i, Self::Error>> {
        let declarations = remaining_source(input);
        self.rules.insert(prelude, declarations);
        Ok(())
    }
}
