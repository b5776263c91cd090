use crate::ast::*;
use crate::error::{CdlError, ParserError};
use crate::lexer::{Lexer, Token, TokenType};
use miette::NamedSource;
use std::sync::Arc;

/// A recursive descent parser for the CDL language, built according to the
/// EBNF grammar. Purely syntactic: constant references are recognized but not
/// resolved here.
#[derive(Debug)]
pub struct Parser<'a> {
    source: Arc<NamedSource<String>>,
    tokens: Vec<Token>,
    position: usize,
    source_text: &'a str,
}

impl<'a> Parser<'a> {
    pub fn new(source_text: &'a str) -> Result<Self, CdlError> {
        Self::new_with_name(source_text, "source.cdl".to_string())
    }

    pub fn new_with_name(source_text: &'a str, name: String) -> Result<Self, CdlError> {
        let source = Arc::new(NamedSource::new(name, source_text.to_string()));
        let mut lexer = Lexer::new(source_text);
        let tokens: Vec<Token> = lexer
            .lex()
            .into_iter()
            .filter(|t| !matches!(t.ttype, TokenType::Whitespace | TokenType::Comment(_)))
            .collect();

        Ok(Self {
            source,
            tokens,
            position: 0,
            source_text,
        })
    }

    // === Main Parsing Methods ===

    /// Document ::= ( ConstantDecl | DictBlock )*
    pub fn parse_document(&mut self) -> Result<CdlDocument, CdlError> {
        let mut items = Vec::new();

        while !self.check(TokenType::Eof) {
            if self.check(TokenType::LParen) {
                items.push(Item::Constant(self.parse_constant_decl()?));
            } else if self.check(TokenType::Begin) {
                items.push(Item::Dict(self.parse_dict_block()?));
            } else {
                return self.err_unexpected("a '(define ...)' or a 'begin ... end' block");
            }
        }

        self.expect(TokenType::Eof)?;
        Ok(CdlDocument { items })
    }

    /// ConstantDecl ::= "(" "define" Identifier Value ")"
    fn parse_constant_decl(&mut self) -> Result<ConstantDecl, CdlError> {
        let start_token = self.current_token()?.clone();
        self.expect(TokenType::LParen)?;
        self.expect(TokenType::Define)?;
        let name = self.parse_name()?;
        let value = self.parse_value()?;
        let end_token = self.current_token()?.clone();
        self.expect(TokenType::RParen)?;

        Ok(ConstantDecl {
            name,
            value,
            pos_start: start_token.pos_start,
            pos_end: end_token.pos_end,
        })
    }

    /// DictBlock ::= "begin" ( Assignment ";" )* "end"
    fn parse_dict_block(&mut self) -> Result<DictBlock, CdlError> {
        let start_token = self.current_token()?.clone();
        self.expect(TokenType::Begin)?;
        let mut assignments = Vec::new();
        while !self.check(TokenType::End) {
            assignments.push(self.parse_assignment()?);
            self.expect(TokenType::Semicolon)?;
        }
        let end_token = self.current_token()?.clone();
        self.expect(TokenType::End)?;

        Ok(DictBlock {
            assignments,
            pos_start: start_token.pos_start,
            pos_end: end_token.pos_end,
        })
    }

    /// Assignment ::= Identifier ":=" Value
    fn parse_assignment(&mut self) -> Result<Assignment, CdlError> {
        let key = self.parse_name()?;
        self.expect(TokenType::Assign)?;
        let value = self.parse_value()?;
        Ok(Assignment { key, value })
    }

    /// Value ::= Integer | String | DictBlock | ConstantRef
    fn parse_value(&mut self) -> Result<ValueNode, CdlError> {
        let start_token = self.current_token()?.clone();

        match &start_token.ttype {
            TokenType::Integer(raw) => {
                self.advance();
                Ok(ValueNode {
                    kind: ValueKind::Integer(raw.clone()),
                    pos_start: start_token.pos_start,
                    pos_end: start_token.pos_end,
                })
            }
            TokenType::String(s) => {
                self.advance();
                Ok(ValueNode {
                    kind: ValueKind::String(s.clone()),
                    pos_start: start_token.pos_start,
                    pos_end: start_token.pos_end,
                })
            }
            TokenType::Begin => {
                let block = self.parse_dict_block()?;
                Ok(ValueNode {
                    pos_start: block.pos_start,
                    pos_end: block.pos_end,
                    kind: ValueKind::Dict(block),
                })
            }
            TokenType::LBracket => self.parse_constant_ref(),
            _ => self.err_unexpected("a value"),
        }
    }

    /// ConstantRef ::= "[" Identifier "]"
    fn parse_constant_ref(&mut self) -> Result<ValueNode, CdlError> {
        let start_token = self.current_token()?.clone();
        self.expect(TokenType::LBracket)?;
        let name = self.parse_name()?;
        let end_token = self.current_token()?.clone();
        self.expect(TokenType::RBracket)?;

        Ok(ValueNode {
            kind: ValueKind::ConstantRef(name),
            pos_start: start_token.pos_start,
            pos_end: end_token.pos_end,
        })
    }

    /// Identifier ::= letter ( letter | digit | "_" )*
    fn parse_name(&mut self) -> Result<String, CdlError> {
        let token = self.current_token()?;
        if let TokenType::Identifier(name) = &token.ttype {
            let name = name.clone();
            self.advance();
            Ok(name)
        } else {
            self.err_unexpected("an identifier")
        }
    }

    // === Tokenizer Helper Methods ===

    fn current_token(&self) -> Result<&Token, CdlError> {
        self.tokens.get(self.position).ok_or_else(|| {
            let pos = self.source_text.len().saturating_sub(1);
            ParserError::UnexpectedEof {
                src: (*self.source).clone(),
                span: (pos, 0).into(),
            }
            .into()
        })
    }

    fn advance(&mut self) {
        if self.position < self.tokens.len() {
            self.position += 1;
        }
    }

    fn expect(&mut self, expected: TokenType) -> Result<(), CdlError> {
        let token = self.current_token()?.clone();
        if std::mem::discriminant(&token.ttype) == std::mem::discriminant(&expected) {
            self.advance();
            Ok(())
        } else {
            Err(ParserError::MissingExpectedToken {
                src: (*self.source).clone(),
                span: (token.pos_start, token.pos_end - token.pos_start).into(),
                expected: format!("{:?}", expected),
            }
            .into())
        }
    }

    fn check(&self, ttype: TokenType) -> bool {
        if let Ok(token) = self.current_token() {
            std::mem::discriminant(&token.ttype) == std::mem::discriminant(&ttype)
        } else {
            false
        }
    }

    fn err_unexpected<T>(&self, expected: &str) -> Result<T, CdlError> {
        let token = self.current_token()?;
        Err(ParserError::UnexpectedToken {
            src: (*self.source).clone(),
            span: (token.pos_start, token.pos_end - token.pos_start).into(),
            expected: expected.to_string(),
        }
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use miette::Report;

    fn parse_ok(source: &str) -> CdlDocument {
        let mut parser = Parser::new_with_name(source, "test.cdl".to_string()).unwrap();
        match parser.parse_document() {
            Ok(doc) => doc,
            Err(err) => {
                let report = Report::from(err);
                panic!("{:#}", report);
            }
        }
    }

    fn parse_err(source: &str) -> CdlError {
        let mut parser = Parser::new_with_name(source, "test.cdl".to_string()).unwrap();
        parser
            .parse_document()
            .expect_err("expected a parse error, but parsing succeeded")
    }

    #[test]
    fn test_empty_document() {
        let doc = parse_ok("");
        assert!(doc.items.is_empty());
    }

    #[test]
    fn test_empty_dict_block() {
        let doc = parse_ok("begin end");
        assert_eq!(doc.items.len(), 1);
        match &doc.items[0] {
            Item::Dict(block) => assert!(block.assignments.is_empty()),
            _ => panic!("expected a dict block"),
        }
    }

    #[test]
    fn test_constant_decl() {
        let doc = parse_ok(r#"(define MAX 100)"#);
        assert_eq!(doc.items.len(), 1);
        match &doc.items[0] {
            Item::Constant(decl) => {
                assert_eq!(decl.name, "MAX");
                assert_eq!(decl.value.kind, ValueKind::Integer("100".to_string()));
            }
            _ => panic!("expected a constant declaration"),
        }
    }

    #[test]
    fn test_constant_decl_with_string_value() {
        let doc = parse_ok(r#"(define HOST "localhost")"#);
        match &doc.items[0] {
            Item::Constant(decl) => {
                assert_eq!(decl.value.kind, ValueKind::String("localhost".to_string()));
            }
            _ => panic!("expected a constant declaration"),
        }
    }

    #[test]
    fn test_assignments_preserve_order() {
        let doc = parse_ok(r#"begin a := 1; b := "two"; c := -3; end"#);
        let block = match &doc.items[0] {
            Item::Dict(block) => block,
            _ => panic!("expected a dict block"),
        };
        let keys: Vec<&str> = block.assignments.iter().map(|a| a.key.as_str()).collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
        assert_eq!(
            block.assignments[2].value.kind,
            ValueKind::Integer("-3".to_string())
        );
    }

    #[test]
    fn test_nested_dict_block() {
        let doc = parse_ok(r#"begin server := begin port := 8080; end; end"#);
        let block = match &doc.items[0] {
            Item::Dict(block) => block,
            _ => panic!("expected a dict block"),
        };
        assert_eq!(block.assignments.len(), 1);
        assert_eq!(block.assignments[0].key, "server");
        match &block.assignments[0].value.kind {
            ValueKind::Dict(inner) => {
                assert_eq!(inner.assignments[0].key, "port");
            }
            _ => panic!("expected a nested dict"),
        }
    }

    #[test]
    fn test_constant_ref() {
        let doc = parse_ok(r#"begin size := [MAX]; end"#);
        let block = match &doc.items[0] {
            Item::Dict(block) => block,
            _ => panic!("expected a dict block"),
        };
        assert_eq!(
            block.assignments[0].value.kind,
            ValueKind::ConstantRef("MAX".to_string())
        );
    }

    #[test]
    fn test_mixed_top_level_items_keep_document_order() {
        let doc = parse_ok(r#"(define A 1) begin x := [A]; end (define B 2) begin y := [B]; end"#);
        assert_eq!(doc.items.len(), 4);
        assert!(matches!(doc.items[0], Item::Constant(_)));
        assert!(matches!(doc.items[1], Item::Dict(_)));
        assert!(matches!(doc.items[2], Item::Constant(_)));
        assert!(matches!(doc.items[3], Item::Dict(_)));
    }

    #[test]
    fn test_comments_are_transparent_to_the_tree() {
        let with_comments = parse_ok(
            r#"(comment header) (define A 1) (comment mid) begin x := [A]; (comment tail) end"#,
        );
        let without_comments = parse_ok(r#"(define A 1) begin x := [A]; end"#);
        assert_eq!(with_comments, without_comments);
    }

    #[test]
    fn test_missing_semicolon_is_an_error() {
        let err = parse_err(r#"begin a := 1 end"#);
        assert!(matches!(err, CdlError::Parser(_)));
    }

    #[test]
    fn test_unbalanced_begin_is_an_error() {
        parse_err(r#"begin a := 1;"#);
    }

    #[test]
    fn test_parse_is_repeatable() {
        let source = r#"(define A 1) begin x := [A]; end"#;
        assert_eq!(parse_ok(source), parse_ok(source));
    }
}
