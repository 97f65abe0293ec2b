//! Tree-walking evaluator
//!
//! Statements produce a [`Completion`]; expressions produce a [`Value`].
//! Every scope entry hoists first and then runs its statements in order.

use crate::call_frame::CallFrame;
use crate::completion::Completion;
use crate::config::InterpreterConfig;
use crate::environment::{EnvRef, Environment};
use crate::operators;
use crate::value::{JsFunction, JsObject, Value};
use core_types::{ensure_sufficient_stack, number_to_string, JsError, SourcePosition};
use parser::ast::{
    Expression, FunctionDefinition, Literal, LogicalOperator, ObjectProperty, PropertyKey,
    Statement, UnaryOperator, VariableKind,
};
use parser::{Program, Scope};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tracing::debug;

/// Assignable location produced by evaluating an assignment target
enum Reference {
    Binding(String),
    Property { object: Value, key: String },
}

/// Runs one program to completion
pub struct Evaluator<'a> {
    config: &'a InterpreterConfig,
    call_stack: Vec<CallFrame>,
    /// Every environment created during the current run
    environments: Vec<Weak<RefCell<Environment>>>,
}

impl<'a> Evaluator<'a> {
    /// Create an evaluator with an empty call stack
    pub fn new(config: &'a InterpreterConfig) -> Self {
        Self {
            config,
            call_stack: Vec::new(),
            environments: Vec::new(),
        }
    }

    /// Execute a program in a fresh scope under `global`.
    ///
    /// On return every environment the run created has been released, so
    /// closures left in the result can no longer reach their bindings.
    pub fn run(&mut self, program: &Program, global: &EnvRef) -> Result<Option<Value>, JsError> {
        let result = self.run_program(program, global);
        self.release_environments();
        result
    }

    fn run_program(
        &mut self,
        program: &Program,
        global: &EnvRef,
    ) -> Result<Option<Value>, JsError> {
        let env = self.track(Environment::new_function_scope(global));
        self.hoist(&program.scope, &env, true);
        self.bind_function_declarations(&program.body, &env);

        match self.execute_statements(&program.body, &env)? {
            Completion::Normal(value) => Ok(value),
            Completion::Return(value) => Ok(Some(value)),
            Completion::Break | Completion::Continue => Ok(None),
        }
    }

    /// Remember `env` so the end of the run can break cycles through it
    fn track(&mut self, env: EnvRef) -> EnvRef {
        if self.environments.len() == self.environments.capacity() {
            self.environments.retain(|scope| scope.strong_count() > 0);
        }
        self.environments.push(Rc::downgrade(&env));
        env
    }

    /// Clear the bindings of every environment still alive. A closure
    /// stored in its own defining scope would otherwise keep that scope,
    /// and every parent up to the global, alive forever.
    fn release_environments(&mut self) {
        let live: Vec<EnvRef> = self
            .environments
            .drain(..)
            .filter_map(|scope| scope.upgrade())
            .collect();
        debug!(environments = live.len(), "releasing environments");
        for scope in &live {
            scope.borrow_mut().release();
        }
    }

    // ---------------------------------------------------------------------
    // Hoisting
    // ---------------------------------------------------------------------

    /// Register the declarations of a scope. A block's `vars` set repeats
    /// names that belong to the enclosing function, so only function scopes
    /// hoist vars.
    fn hoist(&self, scope: &Scope, env: &EnvRef, include_vars: bool) {
        let mut target = env.borrow_mut();
        if include_vars {
            for name in &scope.vars {
                target.declare_var(name);
            }
        }
        for name in &scope.lets {
            target.declare_lexical(name, false);
        }
        for name in &scope.consts {
            target.declare_lexical(name, true);
        }
        if !scope.is_empty() {
            debug!(
                vars = if include_vars { scope.vars.len() } else { 0 },
                lets = scope.lets.len(),
                consts = scope.consts.len(),
                "hoisted declarations"
            );
        }
    }

    /// Bind each function declared directly in `body`. The function closes
    /// over `env`; the name lives in the enclosing function scope.
    fn bind_function_declarations(&self, body: &[Statement], env: &EnvRef) {
        let mut target = None;
        for statement in body {
            if let Statement::FunctionDeclaration { function, .. } = statement {
                let name = function.name.clone().unwrap_or_default();
                let value = self.create_closure(function, env);
                target
                    .get_or_insert_with(|| Environment::function_scope(env))
                    .borrow_mut()
                    .define(&name, value);
            }
        }
    }

    fn create_closure(&self, definition: &Rc<FunctionDefinition>, env: &EnvRef) -> Value {
        Value::Function(Rc::new(JsFunction {
            definition: Rc::clone(definition),
            closure: Rc::clone(env),
        }))
    }

    // ---------------------------------------------------------------------
    // Statements
    // ---------------------------------------------------------------------

    fn execute_statements(
        &mut self,
        statements: &[Statement],
        env: &EnvRef,
    ) -> Result<Completion, JsError> {
        let mut last = None;
        for statement in statements {
            let completion = self.execute_statement(statement, env)?;
            if completion.is_abrupt() {
                return Ok(completion);
            }
            if let Completion::Normal(Some(value)) = completion {
                last = Some(value);
            }
        }
        Ok(Completion::Normal(last))
    }

    fn execute_statement(
        &mut self,
        statement: &Statement,
        env: &EnvRef,
    ) -> Result<Completion, JsError> {
        ensure_sufficient_stack(|| self.execute_statement_inner(statement, env))
    }

    fn execute_statement_inner(
        &mut self,
        statement: &Statement,
        env: &EnvRef,
    ) -> Result<Completion, JsError> {
        match statement {
            Statement::VariableDeclaration {
                kind, declarations, ..
            } => {
                for declarator in declarations {
                    match kind {
                        VariableKind::Var => {
                            if let Some(init) = &declarator.init {
                                let value = self.evaluate(init, env)?;
                                Environment::assign(
                                    env,
                                    &declarator.name,
                                    value,
                                    declarator.position,
                                )?;
                            }
                        }
                        VariableKind::Let | VariableKind::Const => {
                            let value = match &declarator.init {
                                Some(init) => self.evaluate(init, env)?,
                                None => Value::Undefined,
                            };
                            env.borrow_mut().initialize(&declarator.name, value);
                        }
                    }
                }
                Ok(Completion::Normal(None))
            }

            // Bound when the enclosing scope was entered
            Statement::FunctionDeclaration { .. } => Ok(Completion::Normal(None)),

            Statement::ExpressionStatement { expression, .. } => {
                Ok(Completion::Normal(Some(self.evaluate(expression, env)?)))
            }

            Statement::ReturnStatement { argument, .. } => {
                let value = match argument {
                    Some(argument) => self.evaluate(argument, env)?,
                    None => Value::Undefined,
                };
                Ok(Completion::Return(value))
            }

            Statement::IfStatement {
                test,
                consequent,
                alternate,
                ..
            } => {
                if self.evaluate(test, env)?.is_truthy() {
                    self.execute_statement(consequent, env)
                } else if let Some(alternate) = alternate {
                    self.execute_statement(alternate, env)
                } else {
                    Ok(Completion::Normal(None))
                }
            }

            Statement::WhileStatement { test, body, .. } => {
                let mut last = None;
                while self.evaluate(test, env)?.is_truthy() {
                    match self.execute_statement(body, env)? {
                        Completion::Normal(value) => last = value.or(last),
                        Completion::Continue => {}
                        Completion::Break => break,
                        Completion::Return(value) => return Ok(Completion::Return(value)),
                    }
                }
                Ok(Completion::Normal(last))
            }

            Statement::DoWhileStatement { body, test, .. } => {
                let mut last = None;
                loop {
                    match self.execute_statement(body, env)? {
                        Completion::Normal(value) => last = value.or(last),
                        Completion::Continue => {}
                        Completion::Break => break,
                        Completion::Return(value) => return Ok(Completion::Return(value)),
                    }
                    if !self.evaluate(test, env)?.is_truthy() {
                        break;
                    }
                }
                Ok(Completion::Normal(last))
            }

            Statement::BlockStatement {
                body,
                scope,
                position,
            } => {
                debug!(line = position.line, "enter block");
                let block_env = self.track(Environment::new_block(env));
                self.hoist(scope, &block_env, false);
                self.bind_function_declarations(body, &block_env);
                self.execute_statements(body, &block_env)
            }

            Statement::EmptyStatement { .. } => Ok(Completion::Normal(None)),
            Statement::BreakStatement { .. } => Ok(Completion::Break),
            Statement::ContinueStatement { .. } => Ok(Completion::Continue),

            Statement::ThrowStatement { argument, position } => {
                let value = self.evaluate(argument, env)?;
                Err(JsError::uncaught(value.to_js_string(), Some(*position)))
            }

            Statement::WithStatement {
                object,
                body,
                position,
            } => {
                let object = self.evaluate(object, env)?;
                if object.is_nullish() {
                    return Err(JsError::type_error(
                        "Cannot convert undefined or null to object",
                        Some(*position),
                    ));
                }
                let with_env = self.track(Environment::new_object_scope(env, object));
                self.execute_statement(body, &with_env)
            }

            Statement::DebuggerStatement { position } => {
                debug!(
                    line = position.line,
                    column = position.column,
                    depth = self.call_stack.len(),
                    "debugger statement"
                );
                Ok(Completion::Normal(None))
            }
        }
    }

    // ---------------------------------------------------------------------
    // Expressions
    // ---------------------------------------------------------------------

    /// Evaluate an expression to a value
    pub fn evaluate(&mut self, expression: &Expression, env: &EnvRef) -> Result<Value, JsError> {
        ensure_sufficient_stack(|| self.evaluate_inner(expression, env))
    }

    fn evaluate_inner(&mut self, expression: &Expression, env: &EnvRef) -> Result<Value, JsError> {
        match expression {
            Expression::Identifier { name, position } => Environment::lookup(env, name, *position),

            Expression::Literal { value, .. } => Ok(match value {
                Literal::Number(n) => Value::Number(*n),
                Literal::String(s) => Value::String(s.clone()),
                Literal::Boolean(b) => Value::Boolean(*b),
                Literal::Null => Value::Null,
            }),

            Expression::TemplateLiteral {
                quasis,
                expressions,
                ..
            } => {
                let mut text = String::new();
                for (i, quasi) in quasis.iter().enumerate() {
                    text.push_str(quasi);
                    if let Some(expression) = expressions.get(i) {
                        text.push_str(&self.evaluate(expression, env)?.to_js_string());
                    }
                }
                Ok(Value::String(text))
            }

            Expression::ParenthesizedExpression { expression, .. } => {
                self.evaluate(expression, env)
            }

            Expression::BinaryExpression {
                left,
                operator,
                right,
                position,
            } => {
                let left = self.evaluate(left, env)?;
                let right = self.evaluate(right, env)?;
                operators::binary(*operator, &left, &right, *position)
            }

            Expression::LogicalExpression {
                left,
                operator,
                right,
                ..
            } => {
                let left = self.evaluate(left, env)?;
                let decided = match operator {
                    LogicalOperator::And => !left.is_truthy(),
                    LogicalOperator::Or => left.is_truthy(),
                };
                if decided {
                    Ok(left)
                } else {
                    self.evaluate(right, env)
                }
            }

            Expression::UnaryExpression {
                operator: UnaryOperator::Typeof,
                argument,
                ..
            } => {
                let value = match argument.unparenthesized() {
                    Expression::Identifier { name, position } => {
                        Environment::lookup_for_typeof(env, name, *position)
                            .unwrap_or(Value::Undefined)
                    }
                    other => self.evaluate(other, env)?,
                };
                Ok(Value::String(value.type_of().to_string()))
            }

            Expression::UnaryExpression {
                operator, argument, ..
            } => {
                let value = self.evaluate(argument, env)?;
                Ok(operators::unary(*operator, &value))
            }

            Expression::UpdateExpression {
                operator,
                argument,
                prefix,
                position,
            } => {
                let reference = self.evaluate_reference(argument, env)?;
                let current = self.get_reference(&reference, env, *position)?;
                let (old, new) = operators::update(*operator, &current);
                self.put_reference(&reference, Value::Number(new), env, *position)?;
                Ok(Value::Number(if *prefix { new } else { old }))
            }

            Expression::AssignmentExpression {
                target,
                operator,
                value,
                position,
            } => {
                let reference = self.evaluate_reference(target, env)?;
                let result = match operator {
                    Some(operator) => {
                        let current = self.get_reference(&reference, env, *position)?;
                        let rhs = self.evaluate(value, env)?;
                        operators::binary(*operator, &current, &rhs, *position)?
                    }
                    None => self.evaluate(value, env)?,
                };
                self.put_reference(&reference, result.clone(), env, *position)?;
                Ok(result)
            }

            Expression::ConditionalExpression {
                test,
                consequent,
                alternate,
                ..
            } => {
                if self.evaluate(test, env)?.is_truthy() {
                    self.evaluate(consequent, env)
                } else {
                    self.evaluate(alternate, env)
                }
            }

            Expression::SequenceExpression { expressions, .. } => {
                let mut last = Value::Undefined;
                for expression in expressions {
                    last = self.evaluate(expression, env)?;
                }
                Ok(last)
            }

            Expression::MemberExpression { .. } | Expression::CallExpression { .. } => {
                Ok(self.evaluate_chain(expression, env)?.unwrap_or(Value::Undefined))
            }

            Expression::OptionalChain { expression, .. } => {
                Ok(self.evaluate_chain(expression, env)?.unwrap_or(Value::Undefined))
            }

            Expression::NewExpression {
                callee,
                arguments,
                position,
            } => {
                let constructor = self.evaluate(callee, env)?;
                let Value::Function(function) = constructor else {
                    return Err(JsError::type_error(
                        format!("{} is not a constructor", describe_callee(callee)),
                        Some(*position),
                    ));
                };
                let arguments = self.evaluate_arguments(arguments, env)?;
                let result = self.call_function(&function, arguments, *position)?;
                if result.is_object_like() {
                    Ok(result)
                } else {
                    Ok(Value::new_object(JsObject::new()))
                }
            }

            Expression::ArrayExpression { elements, .. } => {
                let mut values = Vec::with_capacity(elements.len());
                for element in elements {
                    values.push(match element {
                        Some(element) => Some(self.evaluate(element, env)?),
                        None => None,
                    });
                }
                Ok(Value::new_array(values))
            }

            Expression::ObjectExpression { properties, .. } => {
                let mut object = JsObject::new();
                for property in properties {
                    let key = self.property_name(&property.key, env)?;
                    let value = self.property_value(property, env)?;
                    object.set(&key, value);
                }
                Ok(Value::new_object(object))
            }

            Expression::FunctionExpression { function, .. } => {
                // A named function expression sees its own name
                match &function.name {
                    Some(name) => {
                        let own_env = self.track(Environment::new_block(env));
                        let value = self.create_closure(function, &own_env);
                        own_env.borrow_mut().define(name, value.clone());
                        Ok(value)
                    }
                    None => Ok(self.create_closure(function, env)),
                }
            }
        }
    }

    /// Evaluate a link of an access chain. `None` means an optional link
    /// met a nullish receiver and the whole chain is Undefined.
    fn evaluate_chain(
        &mut self,
        expression: &Expression,
        env: &EnvRef,
    ) -> Result<Option<Value>, JsError> {
        match expression {
            Expression::MemberExpression {
                object,
                property,
                computed,
                optional,
                position,
            } => {
                let Some(receiver) = self.evaluate_chain(object, env)? else {
                    return Ok(None);
                };
                if *optional && receiver.is_nullish() {
                    return Ok(None);
                }
                let key = self.property_key(property, *computed, env)?;
                receiver.get_property(&key, *position).map(Some)
            }

            Expression::CallExpression {
                callee,
                arguments,
                optional,
                position,
            } => {
                let Some(function) = self.evaluate_chain(callee, env)? else {
                    return Ok(None);
                };
                if *optional && function.is_nullish() {
                    return Ok(None);
                }
                let Value::Function(function) = function else {
                    return Err(JsError::type_error(
                        format!("{} is not a function", describe_callee(callee)),
                        Some(*position),
                    ));
                };
                let arguments = self.evaluate_arguments(arguments, env)?;
                self.call_function(&function, arguments, *position).map(Some)
            }

            other => self.evaluate(other, env).map(Some),
        }
    }

    fn evaluate_arguments(
        &mut self,
        arguments: &[Expression],
        env: &EnvRef,
    ) -> Result<Vec<Value>, JsError> {
        arguments
            .iter()
            .map(|argument| self.evaluate(argument, env))
            .collect()
    }

    /// Key of a member access: the identifier after `.` or the string form
    /// of the bracketed expression
    fn property_key(
        &mut self,
        property: &Expression,
        computed: bool,
        env: &EnvRef,
    ) -> Result<String, JsError> {
        match property {
            Expression::Identifier { name, .. } if !computed => Ok(name.clone()),
            other => Ok(self.evaluate(other, env)?.to_property_key()),
        }
    }

    fn property_name(&mut self, key: &PropertyKey, env: &EnvRef) -> Result<String, JsError> {
        Ok(match key {
            PropertyKey::Identifier(name) | PropertyKey::String(name) => name.clone(),
            PropertyKey::Number(n) => number_to_string(*n),
            PropertyKey::Computed(expression) => self.evaluate(expression, env)?.to_property_key(),
        })
    }

    fn property_value(
        &mut self,
        property: &ObjectProperty,
        env: &EnvRef,
    ) -> Result<Value, JsError> {
        match &property.value {
            Expression::FunctionExpression { function, .. } if property.method => {
                Ok(self.create_closure(function, env))
            }
            value => self.evaluate(value, env),
        }
    }

    // ---------------------------------------------------------------------
    // References
    // ---------------------------------------------------------------------

    fn evaluate_reference(
        &mut self,
        target: &Expression,
        env: &EnvRef,
    ) -> Result<Reference, JsError> {
        match target.unparenthesized() {
            Expression::Identifier { name, .. } => Ok(Reference::Binding(name.clone())),
            Expression::MemberExpression {
                object,
                property,
                computed,
                ..
            } => {
                let object = self.evaluate(object, env)?;
                let key = self.property_key(property, *computed, env)?;
                Ok(Reference::Property { object, key })
            }
            other => Err(JsError::syntax(
                "Invalid assignment target",
                Some(other.position()),
            )),
        }
    }

    fn get_reference(
        &self,
        reference: &Reference,
        env: &EnvRef,
        position: SourcePosition,
    ) -> Result<Value, JsError> {
        match reference {
            Reference::Binding(name) => Environment::lookup(env, name, position),
            Reference::Property { object, key } => object.get_property(key, position),
        }
    }

    fn put_reference(
        &self,
        reference: &Reference,
        value: Value,
        env: &EnvRef,
        position: SourcePosition,
    ) -> Result<(), JsError> {
        match reference {
            Reference::Binding(name) => Environment::assign(env, name, value, position),
            Reference::Property { object, key } => object.set_property(key, value, position),
        }
    }

    // ---------------------------------------------------------------------
    // Calls
    // ---------------------------------------------------------------------

    /// Invoke a function. Errors leaving the call get the call stack
    /// attached if nothing deeper attached one already.
    pub fn call_function(
        &mut self,
        function: &Rc<JsFunction>,
        arguments: Vec<Value>,
        call_site: SourcePosition,
    ) -> Result<Value, JsError> {
        if self.call_stack.len() >= self.config.max_call_depth {
            return Err(JsError::range(
                "Maximum call stack size exceeded",
                Some(call_site),
            ));
        }

        let name = function.definition.name.clone();
        debug!(
            function = name.as_deref().unwrap_or("<anonymous>"),
            arguments = arguments.len(),
            depth = self.call_stack.len() + 1,
            "call"
        );
        self.call_stack.push(CallFrame::new(name, call_site));

        let result = self.invoke(function, arguments).map_err(|mut error| {
            if error.stack.is_empty() {
                error.stack = self
                    .call_stack
                    .iter()
                    .rev()
                    .map(CallFrame::to_stack_frame)
                    .collect();
            }
            error
        });

        self.call_stack.pop();
        debug!(
            function = function.name(),
            ok = result.is_ok(),
            "return"
        );
        result
    }

    fn invoke(&mut self, function: &JsFunction, arguments: Vec<Value>) -> Result<Value, JsError> {
        let definition = &function.definition;
        let env = self.track(Environment::new_function_scope(&function.closure));
        self.hoist(&definition.scope, &env, true);

        let mut arguments = arguments.into_iter();
        for param in &definition.params {
            let value = match (arguments.next(), &param.default) {
                (Some(value), _) if value != Value::Undefined => value,
                (_, Some(default)) => self.evaluate(default, &env)?,
                (value, None) => value.unwrap_or(Value::Undefined),
            };
            env.borrow_mut().define(&param.name, value);
        }

        self.bind_function_declarations(&definition.body, &env);

        match self.execute_statements(&definition.body, &env)? {
            Completion::Return(value) => Ok(value),
            _ => Ok(Value::Undefined),
        }
    }
}

/// Source-like name of a callee for error messages
fn describe_callee(callee: &Expression) -> String {
    match callee.unparenthesized() {
        Expression::Identifier { name, .. } => name.clone(),
        Expression::MemberExpression {
            object,
            property,
            computed: false,
            ..
        } => match property.as_ref() {
            Expression::Identifier { name, .. } => format!("{}.{}", describe_callee(object), name),
            _ => "expression".to_string(),
        },
        Expression::MemberExpression { object, .. } => format!("{}[...]", describe_callee(object)),
        Expression::CallExpression { callee, .. } => format!("{}(...)", describe_callee(callee)),
        _ => "expression".to_string(),
    }
}
