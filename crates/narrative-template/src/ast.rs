/*
 * ast.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Abstract syntax tree for compiled templates.
//!
//! All nodes carry a [`SourceInfo`] so render-time diagnostics can point at
//! the placeholder or block that caused them.

use crate::context::TemplateValue;
use narrative_source_map::SourceInfo;

/// A node in the template AST.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateNode {
    /// Literal text (copied to output unchanged).
    Literal(Literal),

    /// `{{ expr | pipe ... }}`
    Output(Output),

    /// `{{ if }} ... {{ else if }} ... {{ else }} ... {{ end }}`
    Conditional(Conditional),

    /// `{{ for item in list }} ... {{ end }}`
    ForLoop(ForLoop),

    /// `{{ include "Name" }}`
    Include(Include),

    /// `{{# comment }}` (produces no output)
    Comment(Comment),
}

impl TemplateNode {
    pub fn source_info(&self) -> &SourceInfo {
        match self {
            TemplateNode::Literal(n) => &n.source_info,
            TemplateNode::Output(n) => &n.source_info,
            TemplateNode::Conditional(n) => &n.source_info,
            TemplateNode::ForLoop(n) => &n.source_info,
            TemplateNode::Include(n) => &n.source_info,
            TemplateNode::Comment(n) => &n.source_info,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub text: String,
    pub source_info: SourceInfo,
}

/// An interpolated expression with optional pipes.
#[derive(Debug, Clone, PartialEq)]
pub struct Output {
    pub expr: Expr,
    pub pipes: Vec<Pipe>,
    pub source_info: SourceInfo,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Conditional {
    /// `if` / `else if` branches in source order.
    pub branches: Vec<(Expr, Vec<TemplateNode>)>,
    pub else_branch: Option<Vec<TemplateNode>>,
    pub source_info: SourceInfo,
}

/// A for loop. The body sees the current item under `binding` and the
/// iteration state under `loop` (`index`, `first`, `last`).
#[derive(Debug, Clone, PartialEq)]
pub struct ForLoop {
    pub binding: String,
    pub iterable: Expr,
    pub body: Vec<TemplateNode>,
    pub source_info: SourceInfo,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Include {
    pub name: String,
    pub source_info: SourceInfo,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub text: String,
    pub source_info: SourceInfo,
}

/// An expression inside a code block.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal {
        value: TemplateValue,
        source_info: SourceInfo,
    },
    Variable(VariableRef),
    Not {
        operand: Box<Expr>,
        source_info: SourceInfo,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
        source_info: SourceInfo,
    },
}

impl Expr {
    pub fn source_info(&self) -> &SourceInfo {
        match self {
            Expr::Literal { source_info, .. } => source_info,
            Expr::Variable(var) => &var.source_info,
            Expr::Not { source_info, .. } => source_info,
            Expr::Binary { source_info, .. } => source_info,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    And,
    Or,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

/// A reference to a variable, e.g. `object.fields["Health"].value`.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableRef {
    pub path: Vec<PathSegment>,
    pub source_info: SourceInfo,
}

impl VariableRef {
    /// The path as written by the author, for diagnostics.
    pub fn display(&self) -> String {
        let mut out = String::new();
        for segment in &self.path {
            match segment {
                PathSegment::Field(name) => {
                    if !out.is_empty() {
                        out.push('.');
                    }
                    out.push_str(name);
                }
                PathSegment::Index(expr) => match expr.as_ref() {
                    Expr::Literal {
                        value: TemplateValue::String(key),
                        ..
                    } => {
                        out.push_str(&format!("[\"{}\"]", key));
                    }
                    Expr::Literal { value, .. } => out.push_str(&format!("[{}]", value.render())),
                    Expr::Variable(var) => out.push_str(&format!("[{}]", var.display())),
                    _ => out.push_str("[...]"),
                },
            }
        }
        out
    }

    /// The field names of the path when it only uses `.` access.
    pub fn field_names(&self) -> Option<Vec<&str>> {
        self.path
            .iter()
            .map(|segment| match segment {
                PathSegment::Field(name) => Some(name.as_str()),
                PathSegment::Index(_) => None,
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PathSegment {
    Field(String),
    Index(Box<Expr>),
}

/// A pipe applied to an output value.
#[derive(Debug, Clone, PartialEq)]
pub struct Pipe {
    pub kind: PipeKind,
    pub args: Vec<Expr>,
    pub source_info: SourceInfo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipeKind {
    Upcase,
    Downcase,
    Capitalize,
    /// Escape for use inside a double-quoted script string.
    Escape,
    /// Replace a null or empty value with the argument.
    Default,
    /// Join list items with the argument.
    Join,
    /// Number of list items, map entries or string characters.
    Size,
    /// Replace the value with a generated language key and record the
    /// key/value pair for the language file export.
    LangKey,
}

impl PipeKind {
    pub fn from_name(name: &str) -> Option<PipeKind> {
        match name {
            "upcase" => Some(PipeKind::Upcase),
            "downcase" => Some(PipeKind::Downcase),
            "capitalize" => Some(PipeKind::Capitalize),
            "escape" => Some(PipeKind::Escape),
            "default" => Some(PipeKind::Default),
            "join" => Some(PipeKind::Join),
            "size" => Some(PipeKind::Size),
            "langkey" => Some(PipeKind::LangKey),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PipeKind::Upcase => "upcase",
            PipeKind::Downcase => "downcase",
            PipeKind::Capitalize => "capitalize",
            PipeKind::Escape => "escape",
            PipeKind::Default => "default",
            PipeKind::Join => "join",
            PipeKind::Size => "size",
            PipeKind::LangKey => "langkey",
        }
    }

    /// Number of arguments the pipe takes.
    pub fn arity(self) -> usize {
        match self {
            PipeKind::Default | PipeKind::Join => 1,
            _ => 0,
        }
    }
}
