/*
 * parser.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Template parser.
//!
//! Turns template source into a [`Template`] AST. The parser scans the source
//! for `{{ ... }}` code blocks, tokenizes each block and builds the nested
//! node structure with a stack of open `if`/`for` blocks.
//!
//! Parsing stops at the first syntax error. [`Template::parse`] funnels that
//! error into a [`DiagnosticCollector`] instead of returning it, so one broken
//! template never aborts an export.

use crate::ast::{
    BinaryOp, Comment, Conditional, Expr, ForLoop, Include, Literal, Output, PathSegment, Pipe,
    PipeKind, TemplateNode, VariableRef,
};
use crate::codes;
use crate::context::TemplateValue;
use crate::error::{TemplateError, TemplateResult};
use crate::eval_context::DiagnosticCollector;
use crate::lexer::{Token, TokenKind, tokenize};
use narrative_source_map::{FileId, FileInformation, SourceInfo};

/// Identifiers with a fixed meaning at the start of a code block.
const KEYWORDS: &[&str] = &["if", "else", "end", "for", "in", "include"];

/// Deepest allowed nesting of parentheses, `not`, index expressions and
/// `if`/`for` blocks.
pub const MAX_NESTING_DEPTH: usize = 128;

/// A compiled template.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    /// The parsed AST nodes.
    pub nodes: Vec<TemplateNode>,

    /// Template name used in diagnostics (template type or include name).
    pub name: String,

    /// Id of the source in the [`narrative_source_map::SourceContext`] it was
    /// registered in.
    pub file_id: FileId,
}

impl Template {
    /// Compile a standalone template.
    ///
    /// ```
    /// use narrative_template::Template;
    ///
    /// let template = Template::compile("Hello {{ object.name }}").unwrap();
    /// assert_eq!(template.nodes.len(), 2);
    /// assert!(Template::compile("{{ if }}").is_err());
    /// ```
    pub fn compile(source: &str) -> TemplateResult<Template> {
        Self::compile_named(source, "template", FileId(0))
    }

    /// Compile a template whose source is registered under `file_id`.
    pub fn compile_named(source: &str, name: &str, file_id: FileId) -> TemplateResult<Template> {
        let nodes = Parser::new(source, file_id).parse()?;
        Ok(Template {
            nodes,
            name: name.to_string(),
            file_id,
        })
    }

    /// Parse a template, recording syntax errors instead of returning them.
    ///
    /// The source is registered in the collector's source context so
    /// diagnostics can be shown as `name(line,column)`. Returns `None` when
    /// the template is invalid; callers render such a template as empty text.
    pub fn parse(
        source: &str,
        name: &str,
        diagnostics: &mut DiagnosticCollector,
    ) -> Option<Template> {
        let file_id = diagnostics.add_source(name, source);
        match Self::compile_named(source, name, file_id) {
            Ok(template) => Some(template),
            Err(TemplateError::Syntax { message, location }) => {
                tracing::debug!(template = name, %message, "template failed to parse");
                diagnostics.error_with_code(codes::SYNTAX_ERROR, message, location);
                None
            }
            Err(other) => {
                diagnostics.error_with_code(codes::SYNTAX_ERROR, other.to_string(), None);
                None
            }
        }
    }

    pub fn nodes(&self) -> &[TemplateNode] {
        &self.nodes
    }
}

/// Byte offsets of one `{{ ... }}` block.
struct Block {
    open: usize,
    inner_start: usize,
    inner_end: usize,
    close_end: usize,
    trim_left: bool,
    trim_right: bool,
    is_comment: bool,
}

enum OpenKind {
    If {
        branches: Vec<(Expr, Vec<TemplateNode>)>,
        /// Condition of the branch being collected; `None` inside `else`.
        current_condition: Option<Expr>,
    },
    For {
        binding: String,
        iterable: Expr,
    },
}

struct OpenBlock {
    kind: OpenKind,
    nodes: Vec<TemplateNode>,
    source_info: SourceInfo,
}

fn current<'a>(
    stack: &'a mut [OpenBlock],
    root: &'a mut Vec<TemplateNode>,
) -> &'a mut Vec<TemplateNode> {
    match stack.last_mut() {
        Some(block) => &mut block.nodes,
        None => root,
    }
}

struct Parser<'s> {
    source: &'s str,
    file_id: FileId,
    file_info: FileInformation,
}

/// Position in the token list of one block.
struct Cursor<'t> {
    tokens: &'t [Token],
    pos: usize,
    /// Offset just past the block's code, used for "expected ..." errors.
    end_offset: usize,
    /// Current expression nesting depth.
    depth: usize,
}

impl<'t> Cursor<'t> {
    fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<&'t Token> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn peek_is(&self, kind: &TokenKind) -> bool {
        self.peek().is_some_and(|t| &t.kind == kind)
    }

    fn peek_ident(&self, word: &str) -> bool {
        self.peek().is_some_and(|t| t.kind.is_ident(word))
    }
}

impl<'s> Parser<'s> {
    fn new(source: &'s str, file_id: FileId) -> Self {
        Parser {
            source,
            file_id,
            file_info: FileInformation::new(source),
        }
    }

    fn info(&self, start: usize, end: usize) -> SourceInfo {
        let start = self
            .file_info
            .offset_to_location(self.source, start)
            .unwrap_or_default();
        let end = self
            .file_info
            .offset_to_location(self.source, end)
            .unwrap_or(start);
        SourceInfo::from_locations(self.file_id, start, end)
    }

    fn error(&self, message: impl Into<String>, start: usize, end: usize) -> TemplateError {
        TemplateError::Syntax {
            message: message.into(),
            location: self.info(start, end),
        }
    }

    /// Enter one nesting level of an expression opened at `start..end`.
    fn descend(&self, cursor: &mut Cursor<'_>, start: usize, end: usize) -> TemplateResult<()> {
        cursor.depth += 1;
        if cursor.depth > MAX_NESTING_DEPTH {
            return Err(self.error(
                format!("expression nests deeper than {} levels", MAX_NESTING_DEPTH),
                start,
                end,
            ));
        }
        Ok(())
    }

    fn open_block(
        &self,
        stack: &mut Vec<OpenBlock>,
        kind: OpenKind,
        block: &Block,
        source_info: SourceInfo,
    ) -> TemplateResult<()> {
        if stack.len() >= MAX_NESTING_DEPTH {
            return Err(self.error(
                format!("blocks nest deeper than {} levels", MAX_NESTING_DEPTH),
                block.open,
                block.close_end,
            ));
        }
        stack.push(OpenBlock {
            kind,
            nodes: Vec::new(),
            source_info,
        });
        Ok(())
    }

    fn parse(&self) -> TemplateResult<Vec<TemplateNode>> {
        let mut root = Vec::new();
        let mut stack: Vec<OpenBlock> = Vec::new();
        let mut pos = 0;
        let mut trim_next = false;

        loop {
            let next_open = self.source[pos..].find("{{").map(|idx| pos + idx);
            let block = match next_open {
                Some(open) => Some(self.scan_block(open)?),
                None => None,
            };

            let text_end = next_open.unwrap_or(self.source.len());
            let mut text = &self.source[pos..text_end];
            if trim_next {
                text = text.trim_start();
            }
            if block.as_ref().is_some_and(|b| b.trim_left) {
                text = text.trim_end();
            }
            if !text.is_empty() {
                current(&mut stack, &mut root).push(TemplateNode::Literal(Literal {
                    text: text.to_string(),
                    source_info: self.info(pos, text_end),
                }));
            }

            let Some(block) = block else {
                break;
            };
            trim_next = block.trim_right;
            pos = block.close_end;
            self.handle_block(&block, &mut stack, &mut root)?;
        }

        if let Some(open) = stack.last() {
            let keyword = match open.kind {
                OpenKind::If { .. } => "if",
                OpenKind::For { .. } => "for",
            };
            return Err(TemplateError::Syntax {
                message: format!("`{{{{ {} }}}}` is never closed with `{{{{ end }}}}`", keyword),
                location: open.source_info.clone(),
            });
        }

        Ok(root)
    }

    /// Find the end of the block opened at `open`, skipping over string literals.
    fn scan_block(&self, open: usize) -> TemplateResult<Block> {
        let bytes = self.source.as_bytes();
        let mut inner_start = open + 2;
        let trim_left = bytes.get(inner_start) == Some(&b'~');
        if trim_left {
            inner_start += 1;
        }
        let is_comment = self.source[inner_start..].trim_start().starts_with('#');

        let mut quote: Option<(u8, usize)> = None;
        let mut i = inner_start;
        while i < bytes.len() {
            let b = bytes[i];
            match quote {
                Some((q, _)) => {
                    if b == b'\\' {
                        i += 2;
                        continue;
                    }
                    if b == q {
                        quote = None;
                    }
                }
                None => {
                    if b == b'}' && bytes.get(i + 1) == Some(&b'}') {
                        let trim_right = i > inner_start && bytes[i - 1] == b'~';
                        return Ok(Block {
                            open,
                            inner_start,
                            inner_end: if trim_right { i - 1 } else { i },
                            close_end: i + 2,
                            trim_left,
                            trim_right,
                            is_comment,
                        });
                    }
                    if !is_comment && (b == b'"' || b == b'\'') {
                        quote = Some((b, i));
                    }
                }
            }
            i += 1;
        }

        match quote {
            Some((_, quote_start)) => Err(self.error(
                "unterminated string literal",
                quote_start,
                self.source.len(),
            )),
            None => Err(self.error("`{{` is never closed with `}}`", open, open + 2)),
        }
    }

    fn handle_block(
        &self,
        block: &Block,
        stack: &mut Vec<OpenBlock>,
        root: &mut Vec<TemplateNode>,
    ) -> TemplateResult<()> {
        let block_info = self.info(block.open, block.close_end);

        if block.is_comment {
            let text = self.source[block.inner_start..block.inner_end]
                .trim()
                .trim_start_matches('#')
                .trim()
                .to_string();
            current(stack, root).push(TemplateNode::Comment(Comment {
                text,
                source_info: block_info,
            }));
            return Ok(());
        }

        let tokens = tokenize(self.source, block.inner_start, block.inner_end)
            .map_err(|e| self.error(e.message, e.start, e.end))?;
        let mut cursor = Cursor {
            tokens: &tokens,
            pos: 0,
            end_offset: block.inner_end,
            depth: 0,
        };

        let Some(first) = cursor.peek() else {
            return Err(self.error("empty code block", block.open, block.close_end));
        };

        let keyword = match &first.kind {
            TokenKind::Ident(name) if KEYWORDS.contains(&name.as_str()) => Some(name.as_str()),
            _ => None,
        };

        match keyword {
            Some("if") => {
                cursor.next();
                let condition = self.parse_expr(&mut cursor, "after `if`")?;
                self.expect_end(&cursor)?;
                self.open_block(
                    stack,
                    OpenKind::If {
                        branches: Vec::new(),
                        current_condition: Some(condition),
                    },
                    block,
                    block_info,
                )?;
            }
            Some("else") => {
                cursor.next();
                let Some(OpenBlock {
                    kind:
                        OpenKind::If {
                            branches,
                            current_condition,
                        },
                    nodes,
                    ..
                }) = stack.last_mut()
                else {
                    return Err(self.error(
                        "`{{ else }}` without a matching `{{ if }}`",
                        block.open,
                        block.close_end,
                    ));
                };
                let Some(condition) = current_condition.take() else {
                    return Err(self.error(
                        "`{{ else }}` after the final `{{ else }}` of this `if`",
                        block.open,
                        block.close_end,
                    ));
                };
                branches.push((condition, std::mem::take(nodes)));

                if cursor.peek_ident("if") {
                    cursor.next();
                    let condition = self.parse_expr(&mut cursor, "after `else if`")?;
                    self.expect_end(&cursor)?;
                    *current_condition = Some(condition);
                } else {
                    self.expect_end(&cursor)?;
                }
            }
            Some("end") => {
                cursor.next();
                self.expect_end(&cursor)?;
                let Some(open) = stack.pop() else {
                    return Err(self.error(
                        "`{{ end }}` without an open `{{ if }}` or `{{ for }}`",
                        block.open,
                        block.close_end,
                    ));
                };
                let source_info = open.source_info.span_to(&block_info);
                let node = match open.kind {
                    OpenKind::If {
                        mut branches,
                        current_condition,
                    } => {
                        let else_branch = match current_condition {
                            Some(condition) => {
                                branches.push((condition, open.nodes));
                                None
                            }
                            None => Some(open.nodes),
                        };
                        TemplateNode::Conditional(Conditional {
                            branches,
                            else_branch,
                            source_info,
                        })
                    }
                    OpenKind::For { binding, iterable } => TemplateNode::ForLoop(ForLoop {
                        binding,
                        iterable,
                        body: open.nodes,
                        source_info,
                    }),
                };
                current(stack, root).push(node);
            }
            Some("for") => {
                cursor.next();
                let binding = match cursor.next() {
                    Some(Token {
                        kind: TokenKind::Ident(name),
                        ..
                    }) if !KEYWORDS.contains(&name.as_str()) => name.clone(),
                    Some(token) => {
                        return Err(self.error(
                            format!("expected a loop variable name, found {}", token.kind.describe()),
                            token.start,
                            token.end,
                        ));
                    }
                    None => {
                        return Err(self.error(
                            "expected a loop variable name after `for`",
                            cursor.end_offset,
                            cursor.end_offset,
                        ));
                    }
                };
                match cursor.next() {
                    Some(token) if token.kind.is_ident("in") => {}
                    Some(token) => {
                        return Err(self.error(
                            format!("expected `in`, found {}", token.kind.describe()),
                            token.start,
                            token.end,
                        ));
                    }
                    None => {
                        return Err(self.error(
                            "expected `in` after the loop variable",
                            cursor.end_offset,
                            cursor.end_offset,
                        ));
                    }
                }
                let iterable = self.parse_expr(&mut cursor, "after `in`")?;
                self.expect_end(&cursor)?;
                self.open_block(stack, OpenKind::For { binding, iterable }, block, block_info)?;
            }
            Some("include") => {
                cursor.next();
                let name = match cursor.next() {
                    Some(Token {
                        kind: TokenKind::Str(name),
                        ..
                    }) if !name.trim().is_empty() => name.trim().to_string(),
                    Some(token) => {
                        return Err(self.error(
                            format!(
                                "`include` expects a quoted template name, found {}",
                                token.kind.describe()
                            ),
                            token.start,
                            token.end,
                        ));
                    }
                    None => {
                        return Err(self.error(
                            "`include` expects a quoted template name",
                            cursor.end_offset,
                            cursor.end_offset,
                        ));
                    }
                };
                self.expect_end(&cursor)?;
                current(stack, root).push(TemplateNode::Include(Include {
                    name,
                    source_info: block_info,
                }));
            }
            Some(other) => {
                return Err(self.error(
                    format!("`{}` can't start a code block", other),
                    first.start,
                    first.end,
                ));
            }
            None => {
                let output = self.parse_output(&mut cursor, block_info)?;
                current(stack, root).push(TemplateNode::Output(output));
            }
        }

        Ok(())
    }

    fn expect_end(&self, cursor: &Cursor<'_>) -> TemplateResult<()> {
        match cursor.peek() {
            None => Ok(()),
            Some(token) => Err(self.error(
                format!("unexpected {}", token.kind.describe()),
                token.start,
                token.end,
            )),
        }
    }

    fn parse_output(&self, cursor: &mut Cursor<'_>, source_info: SourceInfo) -> TemplateResult<Output> {
        let expr = self.parse_expr(cursor, "")?;
        let mut pipes = Vec::new();

        while cursor.peek_is(&TokenKind::Pipe) {
            let bar = cursor.next().map_or(cursor.end_offset, |t| t.start);
            let Some(name_token) = cursor.next() else {
                return Err(self.error("expected a pipe name after `|`", bar, bar + 1));
            };
            let kind = match &name_token.kind {
                TokenKind::Ident(name) => PipeKind::from_name(name).ok_or_else(|| {
                    self.error(
                        format!("unknown pipe `{}`", name),
                        name_token.start,
                        name_token.end,
                    )
                })?,
                other => {
                    return Err(self.error(
                        format!("expected a pipe name, found {}", other.describe()),
                        name_token.start,
                        name_token.end,
                    ));
                }
            };

            let mut args = Vec::new();
            while !cursor.at_end() && !cursor.peek_is(&TokenKind::Pipe) {
                args.push(self.parse_unary(cursor)?);
            }
            if args.len() != kind.arity() {
                return Err(self.error(
                    format!(
                        "pipe `{}` expects {} argument{}, found {}",
                        kind.name(),
                        kind.arity(),
                        if kind.arity() == 1 { "" } else { "s" },
                        args.len()
                    ),
                    name_token.start,
                    name_token.end,
                ));
            }

            let end = args
                .last()
                .map_or(name_token.end, |arg| arg.source_info().end_offset());
            pipes.push(Pipe {
                kind,
                args,
                source_info: self.info(bar, end),
            });
        }

        self.expect_end(cursor)?;

        if let Some(position) = pipes.iter().position(|p| p.kind == PipeKind::LangKey) {
            let is_field_path = matches!(
                &expr,
                Expr::Variable(var) if var.field_names().is_some_and(|names| names.len() >= 2)
            );
            if position != 0 || !is_field_path {
                let pipe = &pipes[position];
                return Err(TemplateError::Syntax {
                    message: "`langkey` must directly follow a field path such as `object.name`"
                        .to_string(),
                    location: pipe.source_info.clone(),
                });
            }
        }

        Ok(Output {
            expr,
            pipes,
            source_info,
        })
    }

    fn parse_expr(&self, cursor: &mut Cursor<'_>, context: &str) -> TemplateResult<Expr> {
        if cursor.at_end() {
            let message = if context.is_empty() {
                "expected an expression".to_string()
            } else {
                format!("expected an expression {}", context)
            };
            return Err(self.error(message, cursor.end_offset, cursor.end_offset));
        }
        self.parse_or(cursor)
    }

    fn parse_or(&self, cursor: &mut Cursor<'_>) -> TemplateResult<Expr> {
        let mut left = self.parse_and(cursor)?;
        while cursor.peek_is(&TokenKind::OrOr) || cursor.peek_ident("or") {
            cursor.next();
            let right = self.parse_and(cursor)?;
            left = self.binary(BinaryOp::Or, left, right);
        }
        Ok(left)
    }

    fn parse_and(&self, cursor: &mut Cursor<'_>) -> TemplateResult<Expr> {
        let mut left = self.parse_comparison(cursor)?;
        while cursor.peek_is(&TokenKind::AndAnd) || cursor.peek_ident("and") {
            cursor.next();
            let right = self.parse_comparison(cursor)?;
            left = self.binary(BinaryOp::And, left, right);
        }
        Ok(left)
    }

    fn parse_comparison(&self, cursor: &mut Cursor<'_>) -> TemplateResult<Expr> {
        let left = self.parse_unary(cursor)?;
        let op = match cursor.peek().map(|t| &t.kind) {
            Some(TokenKind::EqEq) => BinaryOp::Eq,
            Some(TokenKind::NotEq) => BinaryOp::NotEq,
            Some(TokenKind::Lt) => BinaryOp::Lt,
            Some(TokenKind::LtEq) => BinaryOp::LtEq,
            Some(TokenKind::Gt) => BinaryOp::Gt,
            Some(TokenKind::GtEq) => BinaryOp::GtEq,
            _ => return Ok(left),
        };
        cursor.next();
        let right = self.parse_unary(cursor)?;
        Ok(self.binary(op, left, right))
    }

    fn binary(&self, op: BinaryOp, left: Expr, right: Expr) -> Expr {
        let source_info = left.source_info().span_to(right.source_info());
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
            source_info,
        }
    }

    fn parse_unary(&self, cursor: &mut Cursor<'_>) -> TemplateResult<Expr> {
        if cursor.peek_is(&TokenKind::Bang) || cursor.peek_ident("not") {
            let (start, end) = cursor
                .next()
                .map_or((cursor.end_offset, cursor.end_offset), |t| (t.start, t.end));
            self.descend(cursor, start, end)?;
            let operand = self.parse_unary(cursor)?;
            cursor.depth -= 1;
            let source_info = self.info(start, operand.source_info().end_offset());
            return Ok(Expr::Not {
                operand: Box::new(operand),
                source_info,
            });
        }
        self.parse_primary(cursor)
    }

    fn parse_primary(&self, cursor: &mut Cursor<'_>) -> TemplateResult<Expr> {
        let Some(token) = cursor.next() else {
            return Err(self.error(
                "expected an expression",
                cursor.end_offset,
                cursor.end_offset,
            ));
        };

        let literal = |value: TemplateValue| Expr::Literal {
            value,
            source_info: self.info(token.start, token.end),
        };

        match &token.kind {
            TokenKind::Str(s) => Ok(literal(TemplateValue::String(s.clone()))),
            TokenKind::Number(n) => Ok(literal(TemplateValue::Number(*n))),
            TokenKind::Ident(name) => match name.as_str() {
                "true" => Ok(literal(TemplateValue::Bool(true))),
                "false" => Ok(literal(TemplateValue::Bool(false))),
                "null" => Ok(literal(TemplateValue::Null)),
                word if KEYWORDS.contains(&word) || word == "and" || word == "or" => Err(self
                    .error(
                        format!("unexpected keyword `{}`", word),
                        token.start,
                        token.end,
                    )),
                _ => self.parse_path(cursor, token, name),
            },
            TokenKind::LParen => {
                self.descend(cursor, token.start, token.end)?;
                let inner = self.parse_or(cursor)?;
                cursor.depth -= 1;
                match cursor.next() {
                    Some(Token {
                        kind: TokenKind::RParen,
                        ..
                    }) => Ok(inner),
                    Some(other) => Err(self.error(
                        format!("expected `)`, found {}", other.kind.describe()),
                        other.start,
                        other.end,
                    )),
                    None => Err(self.error(
                        "expected `)` to close `(`",
                        token.start,
                        token.end,
                    )),
                }
            }
            other => Err(self.error(
                format!("unexpected {}", other.describe()),
                token.start,
                token.end,
            )),
        }
    }

    fn parse_path(&self, cursor: &mut Cursor<'_>, first: &Token, name: &str) -> TemplateResult<Expr> {
        let mut path = vec![PathSegment::Field(name.to_string())];
        let mut end = first.end;

        loop {
            if cursor.peek_is(&TokenKind::Dot) {
                let dot = cursor.next().map_or(end, |t| t.start);
                match cursor.next() {
                    Some(Token {
                        kind: TokenKind::Ident(field),
                        end: field_end,
                        ..
                    }) => {
                        path.push(PathSegment::Field(field.clone()));
                        end = *field_end;
                    }
                    _ => {
                        return Err(self.error("expected a field name after `.`", dot, dot + 1));
                    }
                }
            } else if cursor.peek_is(&TokenKind::LBracket) {
                let bracket = cursor.next().map_or(end, |t| t.start);
                if cursor.at_end() {
                    return Err(self.error("expected an index after `[`", bracket, bracket + 1));
                }
                self.descend(cursor, bracket, bracket + 1)?;
                let index = self.parse_or(cursor)?;
                cursor.depth -= 1;
                match cursor.next() {
                    Some(Token {
                        kind: TokenKind::RBracket,
                        end: close,
                        ..
                    }) => end = *close,
                    _ => {
                        return Err(self.error(
                            "expected `]` to close `[`",
                            bracket,
                            bracket + 1,
                        ));
                    }
                }
                path.push(PathSegment::Index(Box::new(index)));
            } else {
                break;
            }
        }

        Ok(Expr::Variable(VariableRef {
            path,
            source_info: self.info(first.start, end),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn compile(source: &str) -> Template {
        Template::compile(source).expect("template should parse")
    }

    fn syntax_error(source: &str) -> (String, (usize, usize)) {
        match Template::compile(source) {
            Err(TemplateError::Syntax { message, location }) => {
                (message, location.range.start.line_col())
            }
            other => panic!("expected a syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_plain_text_is_single_literal() {
        let template = compile("local x = 1\nreturn x\n");
        assert_eq!(template.nodes.len(), 1);
        match &template.nodes[0] {
            TemplateNode::Literal(lit) => assert_eq!(lit.text, "local x = 1\nreturn x\n"),
            other => panic!("expected literal, got {:?}", other),
        }
    }

    #[test]
    fn test_output_with_pipes() {
        let template = compile("{{ object.name | default \"Nobody\" | upcase }}");
        let TemplateNode::Output(output) = &template.nodes[0] else {
            panic!("expected output node");
        };
        let Expr::Variable(var) = &output.expr else {
            panic!("expected variable");
        };
        assert_eq!(var.display(), "object.name");
        let kinds: Vec<_> = output.pipes.iter().map(|p| p.kind).collect();
        assert_eq!(kinds, vec![PipeKind::Default, PipeKind::Upcase]);
        assert_eq!(output.pipes[0].args.len(), 1);
    }

    #[test]
    fn test_conditional_branches() {
        let template = compile("{{ if a }}A{{ else if b }}B{{ else }}C{{ end }}");
        let TemplateNode::Conditional(cond) = &template.nodes[0] else {
            panic!("expected conditional");
        };
        assert_eq!(cond.branches.len(), 2);
        assert!(cond.else_branch.is_some());
    }

    #[test]
    fn test_nested_for_and_if() {
        let template =
            compile("{{ for step in dialog.steps }}{{ if loop.first }}>{{ end }}{{ step.id }}{{ end }}");
        let TemplateNode::ForLoop(for_loop) = &template.nodes[0] else {
            panic!("expected for loop");
        };
        assert_eq!(for_loop.binding, "step");
        assert_eq!(for_loop.body.len(), 2);
    }

    #[test]
    fn test_operator_precedence() {
        let template = compile("{{ if a || b && !c == 1 }}x{{ end }}");
        let TemplateNode::Conditional(cond) = &template.nodes[0] else {
            panic!("expected conditional");
        };
        let Expr::Binary { op, right, .. } = &cond.branches[0].0 else {
            panic!("expected binary expression");
        };
        assert_eq!(*op, BinaryOp::Or);
        assert!(matches!(
            right.as_ref(),
            Expr::Binary {
                op: BinaryOp::And,
                ..
            }
        ));
    }

    #[test]
    fn test_include_and_comment() {
        let template = compile("{{ include \"Header\" }}{{# not rendered }}");
        assert!(matches!(&template.nodes[0], TemplateNode::Include(inc) if inc.name == "Header"));
        assert!(matches!(&template.nodes[1], TemplateNode::Comment(c) if c.text == "not rendered"));
    }

    #[test]
    fn test_trim_markers() {
        let template = compile("a  \n{{~ x ~}}\n  b");
        let texts: Vec<_> = template
            .nodes
            .iter()
            .filter_map(|n| match n {
                TemplateNode::Literal(lit) => Some(lit.text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(texts, vec!["a", "b"]);
    }

    #[test]
    fn test_closing_braces_inside_string() {
        let template = compile("{{ x | default \"}}\" }}!");
        assert_eq!(template.nodes.len(), 2);
    }

    #[test]
    fn test_unclosed_block_reports_position() {
        let (message, position) = syntax_error("line one\n  {{ object.name");
        assert_eq!(message, "`{{` is never closed with `}}`");
        assert_eq!(position, (2, 3));
    }

    #[test]
    fn test_unclosed_if() {
        let (message, position) = syntax_error("{{ if a }}\nmissing end");
        assert_eq!(message, "`{{ if }}` is never closed with `{{ end }}`");
        assert_eq!(position, (1, 1));
    }

    #[test]
    fn test_stray_end_and_else() {
        assert_eq!(
            syntax_error("x{{ end }}").0,
            "`{{ end }}` without an open `{{ if }}` or `{{ for }}`"
        );
        assert_eq!(
            syntax_error("{{ for a in b }}{{ else }}{{ end }}").0,
            "`{{ else }}` without a matching `{{ if }}`"
        );
        assert_eq!(
            syntax_error("{{ if a }}{{ else }}{{ else }}{{ end }}").0,
            "`{{ else }}` after the final `{{ else }}` of this `if`"
        );
    }

    #[test]
    fn test_unknown_pipe() {
        let (message, position) = syntax_error("{{ name | shout }}");
        assert_eq!(message, "unknown pipe `shout`");
        assert_eq!(position, (1, 11));
    }

    #[test]
    fn test_pipe_arity() {
        assert_eq!(
            syntax_error("{{ name | default }}").0,
            "pipe `default` expects 1 argument, found 0"
        );
    }

    #[test]
    fn test_langkey_requires_field_path() {
        assert!(Template::compile("{{ object.name | langkey }}").is_ok());
        assert_eq!(
            syntax_error("{{ name | langkey }}").0,
            "`langkey` must directly follow a field path such as `object.name`"
        );
        assert!(Template::compile("{{ object.name | upcase | langkey }}").is_err());
    }

    #[test]
    fn test_empty_block_and_missing_expression() {
        assert_eq!(syntax_error("{{ }}").0, "empty code block");
        assert_eq!(syntax_error("{{ if }}").0, "expected an expression after `if`");
        assert_eq!(syntax_error("{{ a b }}").0, "unexpected `b`");
    }

    #[test]
    fn test_deep_nesting_is_a_syntax_error() {
        let source = format!("{{{{ if {}x{} }}}}y{{{{ end }}}}", "(".repeat(10_000), ")".repeat(10_000));
        let mut diagnostics = DiagnosticCollector::new();

        assert!(Template::parse(&source, "Deep", &mut diagnostics).is_none());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics.count_code(codes::SYNTAX_ERROR), 1);
        assert_eq!(
            diagnostics.summaries(),
            vec!["Template Syntax Error: expression nests deeper than 128 levels at Deep(1,135)"]
        );

        let negations = format!("{{{{ if {}x }}}}y{{{{ end }}}}", "not ".repeat(5_000));
        assert_eq!(
            syntax_error(&negations).0,
            "expression nests deeper than 128 levels"
        );
    }

    #[test]
    fn test_nesting_up_to_the_limit_parses() {
        let depth = MAX_NESTING_DEPTH;
        let source = format!("{{{{ {}x{} }}}}", "(".repeat(depth), ")".repeat(depth));
        assert!(Template::compile(&source).is_ok());

        let blocks = format!("{}{}", "{{ if a }}".repeat(depth), "{{ end }}".repeat(depth));
        assert!(Template::compile(&blocks).is_ok());
        let too_many = format!("{}{}", "{{ if a }}".repeat(depth + 1), "{{ end }}".repeat(depth + 1));
        assert_eq!(
            syntax_error(&too_many).0,
            "blocks nest deeper than 128 levels"
        );
    }

    #[test]
    fn test_parse_records_diagnostic() {
        let mut diagnostics = DiagnosticCollector::new();
        let result = Template::parse("Hi {{ if }}", "Greeting", &mut diagnostics);
        assert!(result.is_none());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics.diagnostics()[0].code.as_deref(),
            Some(codes::SYNTAX_ERROR)
        );
        assert_eq!(
            diagnostics.summaries(),
            vec!["Template Syntax Error: expected an expression after `if` at Greeting(1,10)"]
        );
    }
}
