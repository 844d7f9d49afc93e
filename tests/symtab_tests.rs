use tacl::ast::Type;
use tacl::symtab::{SymbolError, SymbolKind, SymbolTable, Value};

#[test]
fn duplicate_in_same_scope_is_rejected() {
    let mut table = SymbolTable::new();
    table.enter_scope();
    table.add_symbol("x", Type::Int, None, false).unwrap();
    assert_eq!(
        table.add_symbol("x", Type::Int, None, false),
        Err(SymbolError::Duplicate("x".to_string()))
    );
}

#[test]
fn symbols_die_with_their_scope() {
    let mut table = SymbolTable::new();
    table.enter_scope();
    table.add_symbol("x", Type::Int, None, false).unwrap();
    assert!(table.lookup("x").is_ok());
    table.exit_scope();
    assert_eq!(
        table.lookup("x").err(),
        Some(SymbolError::Undeclared("x".to_string()))
    );
}

#[test]
fn inner_scope_shadows_outer() {
    let mut table = SymbolTable::new();
    table.add_symbol("x", Type::Int, Some(Value::Int(1)), false).unwrap();
    table.enter_scope();
    // same name, different type: legal across frames
    table.add_symbol("x", Type::Bool, Some(Value::Bool(true)), false).unwrap();
    assert_eq!(table.lookup("x").unwrap().symbol_type, Type::Bool);
    table.exit_scope();
    assert_eq!(table.lookup("x").unwrap().symbol_type, Type::Int);
}

#[test]
fn global_scope_cannot_be_popped() {
    let mut table = SymbolTable::new();
    assert_eq!(table.depth(), 1);
    table.exit_scope();
    table.exit_scope();
    assert_eq!(table.depth(), 1);
    // still usable afterwards
    table.add_symbol("g", Type::Int, None, false).unwrap();
    assert!(table.lookup("g").is_ok());
}

#[test]
fn update_symbol_mutates_innermost_binding() {
    let mut table = SymbolTable::new();
    table.add_symbol("x", Type::Int, Some(Value::Int(1)), false).unwrap();
    table.enter_scope();
    table.add_symbol("x", Type::Int, Some(Value::Int(2)), false).unwrap();

    table.update_symbol("x", Value::Int(99)).unwrap();
    assert_eq!(table.lookup("x").unwrap().value, Some(Value::Int(99)));

    table.exit_scope();
    // the outer binding was untouched
    assert_eq!(table.lookup("x").unwrap().value, Some(Value::Int(1)));
}

#[test]
fn update_of_unknown_symbol_fails() {
    let mut table = SymbolTable::new();
    assert_eq!(
        table.update_symbol("ghost", Value::Int(0)),
        Err(SymbolError::Undeclared("ghost".to_string()))
    );
}

#[test]
fn update_reaches_through_inner_scopes() {
    let mut table = SymbolTable::new();
    table.add_symbol("x", Type::Int, Some(Value::Int(1)), false).unwrap();
    table.enter_scope();
    // no shadow here, so the global binding is the first match
    table.update_symbol("x", Value::Int(5)).unwrap();
    table.exit_scope();
    assert_eq!(table.lookup("x").unwrap().value, Some(Value::Int(5)));
}

#[test]
fn registers_functions_with_signatures() {
    let mut table = SymbolTable::new();
    table
        .register_function("max", Type::Int, vec![Type::Int, Type::Int])
        .unwrap();
    let info = table.lookup("max").unwrap();
    assert_eq!(info.kind, SymbolKind::Function);
    assert_eq!(info.return_type, Some(Type::Int));
    assert_eq!(info.parameters, vec![Type::Int, Type::Int]);

    // duplicate check applies to functions too
    assert_eq!(
        table.register_function("max", Type::Int, vec![]),
        Err(SymbolError::Duplicate("max".to_string()))
    );
}

#[test]
fn functions_and_variables_share_the_namespace() {
    let mut table = SymbolTable::new();
    table.add_symbol("f", Type::Int, None, false).unwrap();
    assert_eq!(
        table.register_function("f", Type::Bool, vec![]),
        Err(SymbolError::Duplicate("f".to_string()))
    );
}
