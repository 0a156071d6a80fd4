//! Java source parser
//!
//! Parses source text with tree-sitter and lowers the concrete syntax tree
//! into the [`CompilationUnit`] model. Tree-sitter recovers from malformed
//! input, so the first `ERROR` or `MISSING` node is turned into a
//! [`SyntaxError`] before lowering.
//!
//! Text that is kept verbatim is normalized on the way in: continuation
//! lines are dedented by the column the node starts at, and signature
//! fragments have their line breaks collapsed. The code generator re-indents
//! that text, so parsing generated output yields an equal tree. Lines inside
//! text blocks are part of the literal's value and are never re-indented.

use log::{debug, trace};
use tree_sitter::{Node, Parser};

use crate::{
    error::SyntaxError,
    java_ast::{
        CatchClause, Comment, CompilationUnit, Constructor, Expression, FailureHandlingBlock,
        Member, Modifiers, Procedure, Statement, TypeDeclaration, UnitItem,
    },
};

/// Parse Java source text into a compilation unit
pub fn parse(source: &str) -> Result<CompilationUnit, SyntaxError> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_java::language())
        .map_err(|err| SyntaxError {
            line: 1,
            column: 1,
            message: format!("Java grammar unavailable: {err}"),
        })?;

    let tree = parser.parse(source, None).ok_or_else(|| SyntaxError {
        line: 1,
        column: 1,
        message: "parser produced no syntax tree".to_owned(),
    })?;

    let root = tree.root_node();
    if root.has_error() {
        return Err(syntax_error(root, source));
    }

    let unit = TreeBuilder { source }.compilation_unit(root);
    debug!(
        "Parsed compilation unit with {} items ({} types)",
        unit.items.len(),
        unit.types().count()
    );
    Ok(unit)
}

/// Build the error for the first erroneous node in document order
fn syntax_error(root: Node<'_>, source: &str) -> SyntaxError {
    let node = find_error_node(root).unwrap_or(root);
    let position = node.start_position();
    let message = if node.is_missing() {
        format!("missing `{}`", node.kind())
    } else {
        let snippet = source[node.byte_range()].lines().next().unwrap_or("").trim();
        if snippet.is_empty() {
            "unexpected end of input".to_owned()
        } else {
            let snippet: String = snippet.chars().take(40).collect();
            format!("unexpected `{snippet}`")
        }
    };
    SyntaxError {
        line: position.row + 1,
        column: position.column + 1,
        message,
    }
}

fn find_error_node(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(found) = find_error_node(child) {
            return Some(found);
        }
    }
    None
}

fn is_type_declaration(kind: &str) -> bool {
    matches!(
        kind,
        "class_declaration"
            | "interface_declaration"
            | "enum_declaration"
            | "record_declaration"
            | "annotation_type_declaration"
    )
}

fn is_comment(kind: &str) -> bool {
    matches!(kind, "line_comment" | "block_comment")
}

fn is_javadoc(text: &str) -> bool {
    text.starts_with("/**") && text != "/**/"
}

/// Collapse whitespace runs that contain a line break into a single space.
///
/// Fragments containing a line comment keep their line structure, since
/// joining the lines would comment out the rest of the fragment.
pub(crate) fn collapse_line_breaks(text: &str) -> String {
    let text = text.trim();
    if text.contains("\"\"\"") {
        return dedent(text, 0);
    }
    if text.contains("//") {
        return text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n");
    }

    let mut collapsed = String::with_capacity(text.len());
    let mut whitespace = String::new();
    for ch in text.chars() {
        if ch.is_whitespace() {
            whitespace.push(ch);
            continue;
        }
        if !whitespace.is_empty() {
            if whitespace.contains('\n') {
                collapsed.push(' ');
            } else {
                collapsed.push_str(&whitespace);
            }
            whitespace.clear();
        }
        collapsed.push(ch);
    }
    collapsed
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lexical {
    Code,
    /// Inside a string or char literal opened with the given quote
    Quoted(u8),
    TextBlock,
    BlockComment,
}

/// For every line of `text`, whether it starts inside a text block.
///
/// Those lines belong to the literal's value, including their indentation,
/// and must be emitted exactly as read.
pub(crate) fn text_block_lines(text: &str) -> Vec<bool> {
    let mut state = Lexical::Code;
    let mut flags = Vec::new();
    for line in text.lines() {
        flags.push(state == Lexical::TextBlock);
        if matches!(state, Lexical::Quoted(_)) {
            state = Lexical::Code;
        }

        let bytes = line.as_bytes();
        let mut index = 0;
        while index < bytes.len() {
            let rest = &bytes[index..];
            match state {
                Lexical::Code => {
                    if rest.starts_with(b"\"\"\"") {
                        state = Lexical::TextBlock;
                        index += 3;
                        continue;
                    }
                    if rest.starts_with(b"//") {
                        break;
                    }
                    if rest.starts_with(b"/*") {
                        state = Lexical::BlockComment;
                        index += 2;
                        continue;
                    }
                    if matches!(rest[0], b'"' | b'\'') {
                        state = Lexical::Quoted(rest[0]);
                    }
                }
                Lexical::Quoted(quote) => {
                    if rest[0] == b'\\' {
                        index += 1;
                    } else if rest[0] == quote {
                        state = Lexical::Code;
                    }
                }
                Lexical::TextBlock => {
                    if rest[0] == b'\\' {
                        index += 2;
                        continue;
                    }
                    if rest.starts_with(b"\"\"\"") {
                        state = Lexical::Code;
                        index += 3;
                        continue;
                    }
                }
                Lexical::BlockComment => {
                    if rest.starts_with(b"*/") {
                        state = Lexical::Code;
                        index += 2;
                        continue;
                    }
                }
            }
            index += 1;
        }
    }
    flags
}

/// Remove up to `column` bytes of leading indentation from every line but the
/// first. Lines inside text blocks are kept as they are.
pub(crate) fn dedent(text: &str, column: usize) -> String {
    let text = text.trim_end();
    let raw = text_block_lines(text);
    let mut lines = text.lines().zip(raw);
    let mut dedented = String::with_capacity(text.len());
    if let Some((first, _)) = lines.next() {
        dedented.push_str(first.trim_end());
    }
    for (line, raw) in lines {
        dedented.push('\n');
        if raw {
            dedented.push_str(line);
            continue;
        }
        let indent = line
            .bytes()
            .take(column)
            .take_while(|byte| matches!(byte, b' ' | b'\t'))
            .count();
        dedented.push_str(line[indent..].trim_end());
    }
    dedented
}

/// Lowers tree-sitter nodes into the Java tree model
struct TreeBuilder<'src> {
    source: &'src str,
}

impl<'src> TreeBuilder<'src> {
    fn text(&self, node: Node<'_>) -> &'src str {
        &self.source[node.byte_range()]
    }

    fn verbatim(&self, node: Node<'_>) -> String {
        dedent(self.text(node), node.start_position().column)
    }

    fn collapsed(&self, node: Node<'_>) -> String {
        collapse_line_breaks(self.text(node))
    }

    fn compilation_unit(&self, root: Node<'_>) -> CompilationUnit {
        let mut items = Vec::new();
        let mut pending_doc: Option<Comment> = None;

        let mut cursor = root.walk();
        for child in root.named_children(&mut cursor) {
            let kind = child.kind();
            if kind == "block_comment" && is_javadoc(self.text(child)) {
                if let Some(doc) = pending_doc.replace(Comment::new(self.verbatim(child))) {
                    items.push(UnitItem::Comment(doc.content));
                }
                continue;
            }
            if is_type_declaration(kind) {
                let doc = pending_doc.take().or_else(|| self.leading_doc(child));
                items.push(UnitItem::Type(self.type_declaration(child, doc)));
                continue;
            }

            if let Some(doc) = pending_doc.take() {
                items.push(UnitItem::Comment(doc.content));
            }
            items.push(match kind {
                "package_declaration" => UnitItem::Package(self.collapsed(child)),
                "import_declaration" => UnitItem::Import(self.collapsed(child)),
                _ if is_comment(kind) => UnitItem::Comment(self.verbatim(child)),
                _ => UnitItem::Other(self.verbatim(child)),
            });
        }
        if let Some(doc) = pending_doc {
            items.push(UnitItem::Comment(doc.content));
        }

        CompilationUnit { items }
    }

    /// A Javadoc that tree-sitter placed inside the declaration node
    fn leading_doc(&self, node: Node<'_>) -> Option<Comment> {
        let first = node.named_child(0)?;
        (first.kind() == "block_comment" && is_javadoc(self.text(first)))
            .then(|| Comment::new(self.verbatim(first)))
    }

    /// Byte offset where a declaration starts once comments and modifiers are skipped
    fn declaration_start(&self, node: Node<'_>) -> usize {
        let mut start = node.start_byte();
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.kind() == "modifiers" || is_comment(child.kind()) {
                start = child.end_byte();
            } else {
                break;
            }
        }
        start
    }

    fn modifiers(&self, node: Node<'_>) -> Modifiers {
        let mut modifiers = Modifiers::default();
        let mut cursor = node.walk();
        let Some(modifiers_node) = node
            .children(&mut cursor)
            .find(|child| child.kind() == "modifiers")
        else {
            return modifiers;
        };

        let mut cursor = modifiers_node.walk();
        for child in modifiers_node.children(&mut cursor) {
            if !child.is_named() {
                modifiers.keywords.push(self.text(child).to_owned());
            } else if !is_comment(child.kind()) {
                modifiers.annotations.push(self.collapsed(child));
            }
        }
        modifiers
    }

    fn type_declaration(&self, node: Node<'_>, doc: Option<Comment>) -> TypeDeclaration {
        let start = self.declaration_start(node);
        let name_node = node.child_by_field_name("name");
        let body = node.child_by_field_name("body");

        let name_start = name_node.map_or(start, |name| name.start_byte());
        let name_end = name_node.map_or(start, |name| name.end_byte());
        let body_start = body.map_or(node.end_byte(), |body| body.start_byte());

        let mut decl = TypeDeclaration {
            doc,
            modifiers: self.modifiers(node),
            keyword: collapse_line_breaks(&self.source[start..name_start]),
            name: name_node.map(|name| self.text(name).to_owned()).unwrap_or_default(),
            header: collapse_line_breaks(&self.source[name_end..body_start]),
            enum_constants: None,
            members: Vec::new(),
        };

        if let Some(body) = body {
            if body.kind() == "enum_body" {
                decl.enum_constants = Some(self.enum_constants(body));
                let mut cursor = body.walk();
                let declarations = body
                    .named_children(&mut cursor)
                    .find(|child| child.kind() == "enum_body_declarations");
                if let Some(declarations) = declarations {
                    decl.members = self.members(declarations);
                }
            } else {
                decl.members = self.members(body);
            }
        }

        trace!(
            "Lowered {} {} with {} members",
            decl.keyword,
            decl.name,
            decl.members.len()
        );
        decl
    }

    /// Everything between the opening brace and the body declarations of an enum
    fn enum_constants(&self, body: Node<'_>) -> String {
        let mut cursor = body.walk();
        let children: Vec<Node<'_>> = body.named_children(&mut cursor).collect();
        let Some(first) = children
            .iter()
            .find(|child| child.kind() != "enum_body_declarations")
        else {
            return String::new();
        };

        let end = children
            .iter()
            .find(|child| child.kind() == "enum_body_declarations")
            .map_or_else(
                || {
                    // Up to the closing brace
                    body.end_byte().saturating_sub(1)
                },
                |declarations| declarations.start_byte(),
            );
        let end = end.max(first.start_byte());

        dedent(
            &self.source[first.start_byte()..end],
            first.start_position().column,
        )
    }

    fn members(&self, container: Node<'_>) -> Vec<Member> {
        let mut members = Vec::new();
        let mut pending_doc: Option<Comment> = None;

        let mut cursor = container.walk();
        for child in container.named_children(&mut cursor) {
            let kind = child.kind();
            if kind == "block_comment" && is_javadoc(self.text(child)) {
                if let Some(doc) = pending_doc.replace(Comment::new(self.verbatim(child))) {
                    members.push(Member::Other(doc.content));
                }
                continue;
            }
            match kind {
                "method_declaration" => {
                    let doc = pending_doc.take().or_else(|| self.leading_doc(child));
                    members.push(self.procedure(child, doc));
                }
                "constructor_declaration" | "compact_constructor_declaration" => {
                    let doc = pending_doc.take().or_else(|| self.leading_doc(child));
                    members.push(self.constructor(child, doc));
                }
                _ => {
                    if let Some(doc) = pending_doc.take() {
                        members.push(Member::Other(doc.content));
                    }
                    members.push(match kind {
                        "field_declaration" | "constant_declaration" => {
                            Member::Field(self.verbatim(child))
                        }
                        _ if is_type_declaration(kind) => Member::NestedType {
                            name: child
                                .child_by_field_name("name")
                                .map(|name| self.text(name).to_owned())
                                .unwrap_or_default(),
                            text: self.verbatim(child),
                        },
                        _ => Member::Other(self.verbatim(child)),
                    });
                }
            }
        }
        if let Some(doc) = pending_doc {
            members.push(Member::Other(doc.content));
        }

        members
    }

    fn procedure(&self, node: Node<'_>, doc: Option<Comment>) -> Member {
        let (Some(name), Some(parameters)) = (
            node.child_by_field_name("name"),
            node.child_by_field_name("parameters"),
        ) else {
            return Member::Other(self.verbatim(node));
        };

        Member::Procedure(Procedure {
            doc,
            modifiers: self.modifiers(node),
            return_type: collapse_line_breaks(
                &self.source[self.declaration_start(node)..name.start_byte()],
            ),
            name: self.text(name).to_owned(),
            parameters: self.collapsed(parameters),
            dimensions: node
                .child_by_field_name("dimensions")
                .map(|dimensions| self.collapsed(dimensions))
                .unwrap_or_default(),
            throws: self.throws(node),
            body: node
                .child_by_field_name("body")
                .map(|body| self.block(body)),
        })
    }

    /// Regular and compact (record) constructors; the latter have no parameter list
    fn constructor(&self, node: Node<'_>, doc: Option<Comment>) -> Member {
        let (Some(name), Some(body)) = (
            node.child_by_field_name("name"),
            node.child_by_field_name("body"),
        ) else {
            return Member::Other(self.verbatim(node));
        };
        let parameters = node.child_by_field_name("parameters");
        if parameters.is_none() && node.kind() != "compact_constructor_declaration" {
            return Member::Other(self.verbatim(node));
        }

        Member::Constructor(Constructor {
            doc,
            modifiers: self.modifiers(node),
            type_parameters: collapse_line_breaks(
                &self.source[self.declaration_start(node)..name.start_byte()],
            ),
            name: self.text(name).to_owned(),
            parameters: parameters.map(|parameters| self.collapsed(parameters)),
            throws: self.throws(node),
            body: self.block(body),
        })
    }

    fn throws(&self, node: Node<'_>) -> Vec<String> {
        let mut cursor = node.walk();
        let Some(throws) = node
            .children(&mut cursor)
            .find(|child| child.kind() == "throws")
        else {
            return Vec::new();
        };

        let mut cursor = throws.walk();
        throws
            .named_children(&mut cursor)
            .filter(|child| !is_comment(child.kind()))
            .map(|child| self.collapsed(child))
            .collect()
    }

    fn block(&self, node: Node<'_>) -> Vec<Statement> {
        let mut cursor = node.walk();
        node.named_children(&mut cursor)
            .map(|child| self.statement(child))
            .collect()
    }

    fn statement(&self, node: Node<'_>) -> Statement {
        match node.kind() {
            kind if is_comment(kind) => Statement::Comment(self.verbatim(node)),
            "explicit_constructor_invocation" => Statement::DelegatingCall(self.verbatim(node)),
            "try_statement" => self
                .try_statement(node)
                .map_or_else(|| Statement::Verbatim(self.verbatim(node)), Statement::Try),
            "throw_statement" => self
                .throw_statement(node)
                .map_or_else(|| Statement::Verbatim(self.verbatim(node)), Statement::Throw),
            _ => Statement::Verbatim(self.verbatim(node)),
        }
    }

    /// Structured form of a try statement, or `None` when it carries
    /// anything the model does not represent (comments between clauses,
    /// modifiers on catch parameters)
    fn try_statement(&self, node: Node<'_>) -> Option<FailureHandlingBlock> {
        let body = node.child_by_field_name("body")?;
        let mut block = FailureHandlingBlock {
            body: self.block(body),
            catches: Vec::new(),
            finally: None,
        };

        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            if child.id() == body.id() {
                continue;
            }
            match child.kind() {
                "catch_clause" => block.catches.push(self.catch_clause(child)?),
                "finally_clause" => {
                    let mut cursor = child.walk();
                    let finally_body = child
                        .named_children(&mut cursor)
                        .find(|node| node.kind() == "block")?;
                    block.finally = Some(self.block(finally_body));
                }
                _ => return None,
            }
        }
        Some(block)
    }

    fn catch_clause(&self, node: Node<'_>) -> Option<CatchClause> {
        let body = node.child_by_field_name("body")?;
        let mut cursor = node.walk();
        let parameter = node
            .named_children(&mut cursor)
            .find(|child| child.kind() == "catch_formal_parameter")?;
        let variable = parameter.child_by_field_name("name")?;

        let mut types = Vec::new();
        let mut cursor = parameter.walk();
        for child in parameter.named_children(&mut cursor) {
            if child.id() == variable.id() {
                continue;
            }
            if child.kind() != "catch_type" {
                return None;
            }
            let mut cursor = child.walk();
            for caught in child.named_children(&mut cursor) {
                if is_comment(caught.kind()) {
                    return None;
                }
                types.push(self.collapsed(caught));
            }
        }

        Some(CatchClause {
            types,
            variable: self.text(variable).to_owned(),
            body: self.block(body),
        })
    }

    fn throw_statement(&self, node: Node<'_>) -> Option<Expression> {
        let mut cursor = node.walk();
        let mut named = node.named_children(&mut cursor);
        let expression = named.next()?;
        if named.next().is_some() {
            return None;
        }
        self.expression(expression)
    }

    fn expression(&self, node: Node<'_>) -> Option<Expression> {
        let text = self.text(node);
        match node.kind() {
            "object_creation_expression" => {
                let type_node = node.child_by_field_name("type")?;
                let arguments = node.child_by_field_name("arguments")?;

                // Only plain `new T(...)`: no type arguments, outer instance or anonymous body
                let mut cursor = node.walk();
                let plain = node
                    .named_children(&mut cursor)
                    .all(|child| child.id() == type_node.id() || child.id() == arguments.id());
                if !plain {
                    return None;
                }

                let mut cursor = arguments.walk();
                let arguments = arguments
                    .named_children(&mut cursor)
                    .map(|argument| self.expression(argument))
                    .collect::<Option<Vec<_>>>()?;

                Some(Expression::New {
                    type_name: self.collapsed(type_node),
                    arguments,
                })
            }
            "string_literal" if !text.starts_with("\"\"\"") => text
                .strip_prefix('"')
                .and_then(|rest| rest.strip_suffix('"'))
                .map(|inner| Expression::StringLiteral(inner.to_owned())),
            "identifier" => Some(Expression::Name(text.to_owned())),
            kind if is_comment(kind) => None,
            _ if text.contains('\n') => None,
            _ => Some(Expression::Verbatim(text.to_owned())),
        }
    }
}
