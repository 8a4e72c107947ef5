use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

use super::{
    context::SystemContext,
    error::RuntimeErrorKind,
    value::{NativeFunction, Value},
};

/// The natives every interpreter starts with.
pub fn natives() -> Vec<Rc<dyn NativeFunction>> {
    vec![
        Rc::new(NativeClock) as Rc<dyn NativeFunction>,
        Rc::new(NativePrint),
        Rc::new(NativePrintln),
    ]
}

#[derive(Debug)]
pub struct NativeClock;

impl NativeFunction for NativeClock {
    fn get_name(&self) -> &'static str {
        "clock"
    }

    fn arity(&self) -> usize {
        0
    }

    fn call(
        &self,
        arguments: &[Value],
        context: &mut dyn SystemContext,
    ) -> Result<Value, RuntimeErrorKind> {
        let _ = (arguments, context);
        let since_epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Ok(Value::Number(since_epoch.as_secs_f64()))
    }
}

#[derive(Debug)]
pub struct NativePrint;

impl NativeFunction for NativePrint {
    fn get_name(&self) -> &'static str {
        "print"
    }

    fn arity(&self) -> usize {
        1
    }

    fn call(
        &self,
        arguments: &[Value],
        context: &mut dyn SystemContext,
    ) -> Result<Value, RuntimeErrorKind> {
        for argument in arguments {
            context.write(&argument.to_string());
        }
        Ok(Value::Nil)
    }
}

#[derive(Debug)]
pub struct NativePrintln;

impl NativeFunction for NativePrintln {
    fn get_name(&self) -> &'static str {
        "println"
    }

    fn arity(&self) -> usize {
        1
    }

    fn call(
        &self,
        arguments: &[Value],
        context: &mut dyn SystemContext,
    ) -> Result<Value, RuntimeErrorKind> {
        for argument in arguments {
            context.writeln(&argument.to_string());
        }
        Ok(Value::Nil)
    }
}
