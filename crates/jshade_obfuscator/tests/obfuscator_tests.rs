//! End-to-end obfuscation runs over factory-built programs.

use jshade_ast::types::VariableKind;
use jshade_obfuscator::{
    NodeArena, NodeFactory, NodeId, NodeKind, ObfuscationError, ObfuscationOptions, Obfuscator,
    StringInterner, TransformDriver,
};

fn name_of(arena: &NodeArena, interner: &StringInterner, id: NodeId) -> String {
    match &arena.get(id).kind {
        NodeKind::Identifier(ident) => interner.resolve(ident.name).to_string(),
        other => panic!("expected Identifier, got {}", other.name()),
    }
}

fn verbatim_of(arena: &NodeArena, id: NodeId) -> String {
    match &arena.get(id).kind {
        NodeKind::Literal(literal) => literal.verbatim.content.clone(),
        other => panic!("expected Literal, got {}", other.name()),
    }
}

fn is_generated_name(name: &str) -> bool {
    name.strip_prefix("_0x")
        .map(|digits| digits.len() >= 4 && digits.chars().all(|c| c.is_ascii_hexdigit()))
        .unwrap_or(false)
}

/// `(function () { var test = function (test) { console.log(test);
/// if (true) { var test = 5; } variable = 6; return test; }; })();`
///
/// The inner parameter and the `var` hoisted out of the if-block are one
/// binding, so every `test` inside the inner function gets the same
/// generated name; `console` and `variable` are free and keep their text;
/// the numeric literals re-render in hexadecimal.
#[test]
fn test_function_scope_collapse_end_to_end() {
    let mut f = NodeFactory::new();

    let console_use = f.identifier("console");
    let log_prop = f.identifier("log");
    let log_member = f.member_expression(console_use, log_prop, false);
    let test_arg = f.identifier("test");
    let log_call = f.call_expression(log_member, vec![test_arg]);
    let log_stmt = f.expression_statement(log_call);

    let test_inner_decl = f.identifier("test");
    let five = f.number_literal(5.0);
    let inner_declarator = f.variable_declarator(test_inner_decl, Some(five));
    let inner_var = f.variable_declaration(vec![inner_declarator], VariableKind::Var);
    let if_block = f.block_statement(vec![inner_var]);
    let cond = f.boolean_literal(true);
    let if_stmt = f.if_statement(cond, if_block, None);

    let variable_use = f.identifier("variable");
    let six = f.number_literal(6.0);
    let assignment = f.assignment_expression("=", variable_use, six);
    let assignment_stmt = f.expression_statement(assignment);

    let test_return = f.identifier("test");
    let return_stmt = f.return_statement(Some(test_return));

    let inner_body = f.block_statement(vec![log_stmt, if_stmt, assignment_stmt, return_stmt]);
    let test_param = f.identifier("test");
    let inner_fn = f.function_expression(None, vec![test_param], inner_body);

    let test_outer_decl = f.identifier("test");
    let outer_declarator = f.variable_declarator(test_outer_decl, Some(inner_fn));
    let outer_var = f.variable_declaration(vec![outer_declarator], VariableKind::Var);
    let outer_body = f.block_statement(vec![outer_var]);
    let outer_fn = f.function_expression(None, vec![], outer_body);
    let iife = f.call_expression(outer_fn, vec![]);
    let iife_stmt = f.expression_statement(iife);
    let program = f.program(vec![iife_stmt]);

    let (arena, interner) = f.finish();
    let obfuscator = Obfuscator::new(ObfuscationOptions::default());
    let result = obfuscator.obfuscate(arena, interner, program).unwrap();
    let arena = &result.arena;
    let interner = &result.interner;

    let inner_name = name_of(arena, interner, test_param);
    assert!(is_generated_name(&inner_name), "got {}", inner_name);
    assert_eq!(name_of(arena, interner, test_inner_decl), inner_name);
    assert_eq!(name_of(arena, interner, test_arg), inner_name);
    assert_eq!(name_of(arena, interner, test_return), inner_name);

    // The outer `var test` is a different binding and gets its own name.
    let outer_name = name_of(arena, interner, test_outer_decl);
    assert!(is_generated_name(&outer_name), "got {}", outer_name);
    assert_ne!(outer_name, inner_name);

    assert_eq!(name_of(arena, interner, console_use), "console");
    assert_eq!(name_of(arena, interner, variable_use), "variable");
    assert_eq!(name_of(arena, interner, log_prop), "log");

    assert_eq!(verbatim_of(arena, five), "0x5");
    assert_eq!(verbatim_of(arena, six), "0x6");
}

/// Generated names never collide, across scopes as well as within one.
#[test]
fn test_generated_names_are_globally_unique() {
    let mut f = NodeFactory::new();
    let mut declaration_sites = Vec::new();
    let mut stmts = Vec::new();
    for _ in 0..4 {
        let a_param = f.identifier("a");
        let a_use = f.identifier("a");
        let ret = f.return_statement(Some(a_use));
        let body = f.block_statement(vec![ret]);
        let func = f.function_expression(None, vec![a_param], body);
        stmts.push(f.expression_statement(func));
        declaration_sites.push(a_param);
    }
    let program = f.program(stmts);

    let (arena, interner) = f.finish();
    let obfuscator = Obfuscator::new(ObfuscationOptions::default());
    let result = obfuscator.obfuscate(arena, interner, program).unwrap();

    let mut names: Vec<String> = declaration_sites
        .iter()
        .map(|&site| name_of(&result.arena, &result.interner, site))
        .collect();
    names.sort();
    names.dedup();
    assert_eq!(names.len(), 4, "names collided: {:?}", names);
}

/// Five nested blocks shadowing the same name: each scope keeps its own
/// binding and its own generated name, and every use follows its nearest
/// declaration.
#[test]
fn test_nested_shadowing_blocks() {
    let mut f = NodeFactory::new();
    let mut decls = Vec::new();
    let mut uses = Vec::new();

    let x_decl = f.identifier("x");
    let declarator = f.variable_declarator(x_decl, None);
    let let_decl = f.variable_declaration(vec![declarator], VariableKind::Let);
    let x_use = f.identifier("x");
    let use_stmt = f.expression_statement(x_use);
    decls.push(x_decl);
    uses.push(x_use);
    let mut block = f.block_statement(vec![let_decl, use_stmt]);

    for _ in 0..4 {
        let x_decl = f.identifier("x");
        let declarator = f.variable_declarator(x_decl, None);
        let let_decl = f.variable_declaration(vec![declarator], VariableKind::Let);
        let x_use = f.identifier("x");
        let use_stmt = f.expression_statement(x_use);
        decls.push(x_decl);
        uses.push(x_use);
        block = f.block_statement(vec![let_decl, use_stmt, block]);
    }
    let program = f.program(vec![block]);

    let (arena, interner) = f.finish();
    let obfuscator = Obfuscator::new(ObfuscationOptions::default());
    let result = obfuscator.obfuscate(arena, interner, program).unwrap();

    let decl_names: Vec<String> = decls
        .iter()
        .map(|&d| name_of(&result.arena, &result.interner, d))
        .collect();
    for (i, name) in decl_names.iter().enumerate() {
        assert!(is_generated_name(name));
        for other in &decl_names[i + 1..] {
            assert_ne!(name, other);
        }
    }
    for (&use_site, decl_name) in uses.iter().zip(&decl_names) {
        assert_eq!(&name_of(&result.arena, &result.interner, use_site), decl_name);
    }
}

/// String literals keep their semantic value; only the rendering changes,
/// and it changes to pure hex escapes in the original quote style.
#[test]
fn test_string_literal_round_trip() {
    let mut f = NodeFactory::new();
    let lit = f.string_literal("log");
    let stmt = f.expression_statement(lit);
    let program = f.program(vec![stmt]);

    let (arena, interner) = f.finish();
    let obfuscator = Obfuscator::new(ObfuscationOptions::default());
    let result = obfuscator.obfuscate(arena, interner, program).unwrap();

    match &result.arena.get(lit).kind {
        NodeKind::Literal(literal) => {
            assert_eq!(
                literal.value,
                jshade_ast::types::LiteralValue::String("log".to_string())
            );
            assert_eq!(literal.verbatim.content, r"'\x6c\x6f\x67'");
            assert_eq!(literal.raw, "'log'");
        }
        other => panic!("expected Literal, got {}", other.name()),
    }
}

/// Re-running the same driver over its own output changes nothing: every
/// node is already in the visited set.
#[test]
fn test_rerun_is_idempotent() {
    let mut f = NodeFactory::new();
    let x_decl = f.identifier("x");
    let five = f.number_literal(5.0);
    let declarator = f.variable_declarator(x_decl, Some(five));
    let var_decl = f.variable_declaration(vec![declarator], VariableKind::Var);
    let program = f.program(vec![var_decl]);

    let (arena, interner) = f.finish();
    let mut driver = TransformDriver::new(ObfuscationOptions::default());
    let output = driver.run(arena, &interner, program).unwrap();
    let renamed = name_of(&output.arena, &interner, x_decl);
    let encoded = verbatim_of(&output.arena, five);

    let output = driver.run(output.arena, &interner, program).unwrap();
    assert_eq!(name_of(&output.arena, &interner, x_decl), renamed);
    assert_eq!(verbatim_of(&output.arena, five), encoded);
}

/// Reserved names keep their text even when bound.
#[test]
fn test_reserved_names_survive() {
    let mut f = NodeFactory::new();
    let jq_decl = f.identifier("jQuery");
    let jq_declarator = f.variable_declarator(jq_decl, None);
    let other_decl = f.identifier("helper");
    let other_declarator = f.variable_declarator(other_decl, None);
    let var_decl =
        f.variable_declaration(vec![jq_declarator, other_declarator], VariableKind::Var);
    let program = f.program(vec![var_decl]);

    let (arena, interner) = f.finish();
    let mut options = ObfuscationOptions::default();
    options.reserved_names.insert("jQuery".to_string());
    let obfuscator = Obfuscator::new(options);
    let result = obfuscator.obfuscate(arena, interner, program).unwrap();

    assert_eq!(name_of(&result.arena, &result.interner, jq_decl), "jQuery");
    let other = name_of(&result.arena, &result.interner, other_decl);
    assert!(is_generated_name(&other), "got {}", other);
}

/// An injected predicate replaces the reserved list wholesale.
#[test]
fn test_injected_reserved_predicate() {
    let mut f = NodeFactory::new();
    let keep_decl = f.identifier("keep_me");
    let declarator = f.variable_declarator(keep_decl, None);
    let var_decl = f.variable_declaration(vec![declarator], VariableKind::Var);
    let program = f.program(vec![var_decl]);

    let (arena, interner) = f.finish();
    let obfuscator = Obfuscator::new(ObfuscationOptions::default());
    let result = obfuscator
        .obfuscate_with_reserved(arena, interner, program, |name| name.starts_with("keep_"))
        .unwrap();
    assert_eq!(name_of(&result.arena, &result.interner, keep_decl), "keep_me");
}

/// With renaming disabled the tree's identifiers come back untouched while
/// literal encoding still applies.
#[test]
fn test_renaming_disabled() {
    let mut f = NodeFactory::new();
    let x_decl = f.identifier("x");
    let six = f.number_literal(6.0);
    let declarator = f.variable_declarator(x_decl, Some(six));
    let var_decl = f.variable_declaration(vec![declarator], VariableKind::Var);
    let program = f.program(vec![var_decl]);

    let (arena, interner) = f.finish();
    let mut options = ObfuscationOptions::default();
    options.identifier_renaming = false;
    let obfuscator = Obfuscator::new(options);
    let result = obfuscator.obfuscate(arena, interner, program).unwrap();

    assert_eq!(name_of(&result.arena, &result.interner, x_decl), "x");
    assert_eq!(verbatim_of(&result.arena, six), "0x6");
}

/// An empty program transforms successfully into an empty program.
#[test]
fn test_empty_program() {
    let mut f = NodeFactory::new();
    let program = f.program(vec![]);
    let (arena, interner) = f.finish();
    let obfuscator = Obfuscator::new(ObfuscationOptions::default());
    let result = obfuscator.obfuscate(arena, interner, program).unwrap();
    assert_eq!(result.scopes.binding_count(), 0);
    // Results are debug-printable for assertion failures and logging.
    assert!(format!("{:?}", result).contains("ObfuscationResult"));
}

/// A program with no declarations at all: free identifiers and property
/// names all keep their text.
#[test]
fn test_program_without_declarations() {
    let mut f = NodeFactory::new();
    let console_use = f.identifier("console");
    let log_prop = f.identifier("log");
    let member = f.member_expression(console_use, log_prop, false);
    let msg = f.string_literal("hi");
    let call = f.call_expression(member, vec![msg]);
    let stmt = f.expression_statement(call);
    let program = f.program(vec![stmt]);

    let (arena, interner) = f.finish();
    let obfuscator = Obfuscator::new(ObfuscationOptions::default());
    let result = obfuscator.obfuscate(arena, interner, program).unwrap();

    assert_eq!(name_of(&result.arena, &result.interner, console_use), "console");
    assert_eq!(name_of(&result.arena, &result.interner, log_prop), "log");
    assert_eq!(result.scopes.binding_count(), 0);
    assert_eq!(verbatim_of(&result.arena, msg), r"'\x68\x69'");
}

/// A malformed binding position aborts the run before any rewrite.
#[test]
fn test_malformed_tree_aborts() {
    let mut f = NodeFactory::new();
    let not_an_identifier = f.number_literal(3.0);
    let declarator = f.variable_declarator(not_an_identifier, None);
    let var_decl = f.variable_declaration(vec![declarator], VariableKind::Var);
    let program = f.program(vec![var_decl]);

    let (arena, interner) = f.finish();
    let obfuscator = Obfuscator::new(ObfuscationOptions::default());
    let err = obfuscator.obfuscate(arena, interner, program).unwrap_err();
    match err {
        ObfuscationError::ScopeResolution(diagnostic) => {
            assert_eq!(diagnostic.code, 1001);
        }
        other => panic!("expected a scope resolution error, got {}", other),
    }
}
