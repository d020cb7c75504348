use crate::callable::{Function, NativeFn, NativeFunction};
use crate::dict::{Dict, SMALL_BUCKETS};
use crate::error::RuntimeError;
use crate::handle::{Handle, HandleError};
use crate::instance::Instance;
use crate::interpreter::Interpreter;
use crate::shared_list::SharedList;
use crate::value::Value;
use phf::phf_map;
use std::fs;
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

type NativeResult = Result<Value, RuntimeError>;

/// Builtins callable by name. These are also bound as globals.
static BUILTINS: phf::Map<&'static str, NativeFn> = phf_map! {
    "read_file" => read_file as NativeFn,
    "write_file" => write_file as NativeFn,
    "sqrt" => sqrt as NativeFn,
    "len" => len as NativeFn,
    "print" => print as NativeFn,
    "abs" => abs as NativeFn,
    "max" => max as NativeFn,
    "min" => min as NativeFn,
    "str_len" => str_len as NativeFn,
    "str_slice" => str_slice as NativeFn,
    "str_replace" => str_replace as NativeFn,
    "list_append" => list_append as NativeFn,
    "list_pop" => list_pop as NativeFn,
    "dict_keys" => dict_keys as NativeFn,
    "dict_values" => dict_values as NativeFn,
    "json_format" => json_format as NativeFn,
    "clock" => clock as NativeFn,
    "timing" => timing as NativeFn,
};

/// Short method-style names, used by the namespace objects and by method
/// calls on strings, lists and dicts.
static ALIASES: phf::Map<&'static str, NativeFn> = phf_map! {
    "slice" => str_slice as NativeFn,
    "replace" => str_replace as NativeFn,
    "append" => list_append as NativeFn,
    "pop" => list_pop as NativeFn,
    "keys" => dict_keys as NativeFn,
    "values" => dict_values as NativeFn,
    "open" => file_open as NativeFn,
    "write" => file_write as NativeFn,
    "read" => file_read as NativeFn,
    "close" => file_close as NativeFn,
    "alloc" => mem_alloc as NativeFn,
    "free" => mem_free as NativeFn,
    "set" => mem_set as NativeFn,
    "get" => mem_get as NativeFn,
    "sleep" => sys_sleep as NativeFn,
    "exit" => sys_exit as NativeFn,
    "alloc_exec" => asm_alloc_exec as NativeFn,
    "exec" => asm_exec as NativeFn,
};

const NAMESPACES: [(&str, &[&str]); 4] = [
    ("f", &["open"]),
    ("mem", &["alloc", "free", "set", "get"]),
    ("sys", &["sleep", "exit"]),
    ("asm", &["alloc_exec", "exec"]),
];

fn native(table: &'static phf::Map<&'static str, NativeFn>, name: &str) -> Option<NativeFunction> {
    table
        .get_entry(name)
        .map(|(name, call)| NativeFunction {
            name: *name,
            call: *call,
        })
}

/// Resolves a plain call. Both tiers are consulted, named builtins first,
/// and a match here wins over any user function of the same name.
pub fn lookup(name: &str) -> Option<NativeFunction> {
    native(&BUILTINS, name).or_else(|| native(&ALIASES, name))
}

/// Resolves `receiver.name(...)` for strings, lists and dicts.
pub fn method(name: &str) -> Option<NativeFunction> {
    native(&ALIASES, name).or_else(|| native(&BUILTINS, name))
}

/// The members a file handle answers to.
pub fn file_method(name: &str) -> Option<NativeFunction> {
    match name {
        "write" | "read" | "close" => native(&ALIASES, name),
        _ => None,
    }
}

/// Binds every named builtin and the `f`, `mem`, `sys` and `asm` namespace
/// objects in the global scope.
pub fn register_globals(interpreter: &mut Interpreter) {
    for (name, call) in BUILTINS.entries() {
        interpreter.environment.set_variable(
            name,
            Value::Function(Function::Native(NativeFunction {
                name: *name,
                call: *call,
            })),
        );
    }
    for (namespace, members) in NAMESPACES.iter() {
        let mut fields = Dict::with_buckets(SMALL_BUCKETS);
        for member in members.iter() {
            if let Some(function) = native(&ALIASES, member) {
                fields.insert(member, Value::Function(Function::Native(function)));
            }
        }
        interpreter
            .environment
            .set_variable(namespace, Value::Object(Instance::with_fields(None, fields)));
    }
}

fn string_arg(args: &[Value], index: usize) -> Option<&str> {
    match args.get(index) {
        Some(Value::Str(s)) => Some(s.as_str()),
        _ => None,
    }
}

fn number_arg(args: &[Value], index: usize) -> Option<f64> {
    match args.get(index) {
        Some(Value::Number(n)) => Some(*n),
        _ => None,
    }
}

fn handle_arg(args: &[Value], index: usize) -> Option<&Handle> {
    match args.get(index) {
        Some(Value::FileHandle(handle)) => Some(handle),
        _ => None,
    }
}

/// Negative offsets map past any block so the bounds check rejects them.
fn offset(n: f64) -> usize {
    if n < 0.0 {
        usize::MAX
    } else {
        n as usize
    }
}

fn failure(interpreter: &mut Interpreter, message: &str) -> NativeResult {
    interpreter.write_line(message);
    Ok(Value::Null)
}

fn print(interpreter: &mut Interpreter, args: &[Value]) -> NativeResult {
    let line: Vec<String> = args.iter().map(|arg| arg.to_string()).collect();
    interpreter.write_line(&line.join(" "));
    Ok(Value::Null)
}

fn sqrt(_: &mut Interpreter, args: &[Value]) -> NativeResult {
    match (args.len(), number_arg(args, 0)) {
        (1, Some(n)) => Ok(Value::Number(n.sqrt())),
        _ => Ok(Value::Null),
    }
}

fn read_file(interpreter: &mut Interpreter, args: &[Value]) -> NativeResult {
    let path = match (args.len(), string_arg(args, 0)) {
        (1, Some(path)) => path,
        _ => {
            return failure(
                interpreter,
                "Error: read_file expects a single string argument",
            )
        }
    };
    match fs::read(path) {
        Ok(bytes) => Ok(Value::Str(String::from_utf8_lossy(&bytes).into_owned())),
        Err(err) => {
            debug!(path, %err, "read_file failed");
            failure(interpreter, &format!("Error: Could not open file '{}'", path))
        }
    }
}

fn write_file(interpreter: &mut Interpreter, args: &[Value]) -> NativeResult {
    let (path, content) = match (args.len(), string_arg(args, 0), string_arg(args, 1)) {
        (2, Some(path), Some(content)) => (path, content),
        _ => return failure(interpreter, "Error: write_file expects (filename, content)"),
    };
    if let Err(err) = fs::write(path, content) {
        debug!(path, %err, "write_file failed");
        return failure(
            interpreter,
            &format!("Error: Could not open file '{}' for writing", path),
        );
    }
    Ok(Value::Null)
}

/// Characters of a string, items of a list, entries of a dict.
fn len(_: &mut Interpreter, args: &[Value]) -> NativeResult {
    let n = match args {
        [Value::Str(s)] => s.chars().count(),
        [Value::List(list)] => list.len(),
        [Value::Dict(dict)] => dict.borrow().len(),
        _ => 0,
    };
    Ok(Value::Number(n as f64))
}

fn abs(_: &mut Interpreter, args: &[Value]) -> NativeResult {
    Ok(Value::Number(number_arg(args, 0).map_or(0.0, f64::abs)))
}

fn extreme(args: &[Value], better: fn(f64, f64) -> bool) -> Value {
    if args.is_empty() {
        return Value::Number(0.0);
    }
    let first = number_arg(args, 0).unwrap_or(0.0);
    let best = args[1..]
        .iter()
        .filter_map(|arg| match arg {
            Value::Number(n) => Some(*n),
            _ => None,
        })
        .fold(first, |best, n| if better(n, best) { n } else { best });
    Value::Number(best)
}

fn max(_: &mut Interpreter, args: &[Value]) -> NativeResult {
    Ok(extreme(args, |n, best| n > best))
}

fn min(_: &mut Interpreter, args: &[Value]) -> NativeResult {
    Ok(extreme(args, |n, best| n < best))
}

fn str_len(_: &mut Interpreter, args: &[Value]) -> NativeResult {
    let n = string_arg(args, 0).map_or(0, |s| s.chars().count());
    Ok(Value::Number(n as f64))
}

/// `str_slice(s, start, end)`: negative bounds count from the end, `end` is
/// clamped to the length, and an empty range gives "".
fn str_slice(_: &mut Interpreter, args: &[Value]) -> NativeResult {
    let text = match string_arg(args, 0) {
        Some(text) if args.len() >= 3 => text,
        _ => return Ok(Value::Null),
    };
    let chars: Vec<char> = text.chars().collect();
    let length = chars.len() as i64;
    let mut start = number_arg(args, 1).unwrap_or(0.0) as i64;
    let mut end = number_arg(args, 2).unwrap_or(0.0) as i64;
    if start < 0 {
        start += length;
    }
    if end < 0 {
        end += length;
    }
    start = start.max(0);
    end = end.min(length);
    if start >= end {
        return Ok(Value::Str(String::new()));
    }
    Ok(Value::Str(chars[start as usize..end as usize].iter().collect()))
}

/// Replaces the first occurrence only.
fn str_replace(_: &mut Interpreter, args: &[Value]) -> NativeResult {
    match (
        string_arg(args, 0),
        string_arg(args, 1),
        string_arg(args, 2),
    ) {
        (Some(text), Some(old), Some(new)) => Ok(Value::Str(text.replacen(old, new, 1))),
        _ => Ok(Value::Null),
    }
}

fn list_append(_: &mut Interpreter, args: &[Value]) -> NativeResult {
    match args {
        [Value::List(list), item, ..] => {
            list.push(item.clone());
            Ok(Value::Number(1.0))
        }
        _ => Ok(Value::Null),
    }
}

fn list_pop(_: &mut Interpreter, args: &[Value]) -> NativeResult {
    match args.first() {
        Some(Value::List(list)) => Ok(list.pop().unwrap_or(Value::Null)),
        _ => Ok(Value::Null),
    }
}

fn dict_keys(_: &mut Interpreter, args: &[Value]) -> NativeResult {
    match args.first() {
        Some(Value::Dict(dict)) => {
            let keys: Vec<Value> = dict.borrow().keys().into_iter().map(Value::Str).collect();
            Ok(Value::List(SharedList::from(keys)))
        }
        _ => Ok(Value::Null),
    }
}

fn dict_values(_: &mut Interpreter, args: &[Value]) -> NativeResult {
    match args.first() {
        Some(Value::Dict(dict)) => Ok(Value::List(SharedList::from(dict.borrow().values()))),
        _ => Ok(Value::Null),
    }
}

/// Pretty-prints a JSON document with two-space indentation.
fn json_format(_: &mut Interpreter, args: &[Value]) -> NativeResult {
    let text = match (args.len(), string_arg(args, 0)) {
        (1, Some(text)) => text,
        _ => return Ok(Value::Null),
    };
    let formatted = serde_json::from_str::<serde_json::Value>(text)
        .and_then(|json| serde_json::to_string_pretty(&json));
    match formatted {
        Ok(pretty) => Ok(Value::Str(pretty)),
        Err(err) => {
            debug!(%err, "json_format rejected its input");
            Ok(Value::Null)
        }
    }
}

fn clock(interpreter: &mut Interpreter, _: &[Value]) -> NativeResult {
    Ok(Value::Number(interpreter.elapsed_seconds()))
}

fn timing(interpreter: &mut Interpreter, _: &[Value]) -> NativeResult {
    let timings = interpreter.timings;
    let mut dict = Dict::with_buckets(SMALL_BUCKETS);
    dict.insert("compile_time", Value::Number(timings.compile_time));
    dict.insert("execute_time", Value::Number(timings.execute_time));
    dict.insert("total_time", Value::Number(timings.total_time));
    Ok(Value::Dict(dict.shared()))
}

/// `f.open(filename, mode = "r")`
fn file_open(interpreter: &mut Interpreter, args: &[Value]) -> NativeResult {
    let path = match string_arg(args, 0) {
        Some(path) => path,
        None => return failure(interpreter, "Error: f.open expects at least a filename"),
    };
    let mode = string_arg(args, 1).unwrap_or("r");
    match Handle::open(path, mode) {
        Ok(handle) => Ok(Value::FileHandle(handle)),
        Err(err) => {
            debug!(path, mode, %err, "open failed");
            failure(interpreter, &format!("Error: Failed to open file '{}'", path))
        }
    }
}

fn file_write(interpreter: &mut Interpreter, args: &[Value]) -> NativeResult {
    let (handle, content) = match (handle_arg(args, 0), string_arg(args, 1)) {
        (Some(handle), Some(content)) => (handle, content),
        _ => return failure(interpreter, "Error: write expects (content)"),
    };
    match handle.write(content) {
        Ok(()) => Ok(Value::Null),
        Err(err) => failure(interpreter, &format!("Error: {}", err)),
    }
}

fn file_read(interpreter: &mut Interpreter, args: &[Value]) -> NativeResult {
    let handle = match handle_arg(args, 0) {
        Some(handle) => handle,
        None => return failure(interpreter, "Error: read expects a file object"),
    };
    match handle.read() {
        Ok(Some(text)) => Ok(Value::Str(text)),
        Ok(None) => Ok(Value::Null),
        Err(err) => {
            debug!(%err, "read failed");
            Ok(Value::Null)
        }
    }
}

fn file_close(interpreter: &mut Interpreter, args: &[Value]) -> NativeResult {
    let handle = match handle_arg(args, 0) {
        Some(handle) => handle,
        None => return failure(interpreter, "Error: close expects a file object"),
    };
    match handle.close() {
        Ok(()) => Ok(Value::Null),
        Err(err) => failure(interpreter, &format!("Error: {}", err)),
    }
}

fn memory_enabled(interpreter: &mut Interpreter, name: &str) -> bool {
    if interpreter.options().unsafe_memory {
        return true;
    }
    warn!(builtin = name, "memory builtin refused outside unsafe mode");
    interpreter.write_line(&format!(
        "Error: mem.{} requires unsafe mode (run with --unsafe)",
        name
    ));
    false
}

fn memory_failure(interpreter: &mut Interpreter, err: HandleError) -> NativeResult {
    failure(interpreter, &format!("Error: {}", err))
}

fn mem_alloc(interpreter: &mut Interpreter, args: &[Value]) -> NativeResult {
    if !memory_enabled(interpreter, "alloc") {
        return Ok(Value::Null);
    }
    match number_arg(args, 0) {
        Some(size) if size >= 0.0 => match Handle::memory(size as usize) {
            Ok(block) => Ok(Value::FileHandle(block)),
            Err(err) => memory_failure(interpreter, err),
        },
        _ => failure(interpreter, "Error: mem.alloc expects size"),
    }
}

fn mem_free(interpreter: &mut Interpreter, args: &[Value]) -> NativeResult {
    if !memory_enabled(interpreter, "free") {
        return Ok(Value::Null);
    }
    let block = match handle_arg(args, 0) {
        Some(block) => block,
        None => return failure(interpreter, "Error: mem.free expects a pointer"),
    };
    match block.free() {
        Ok(()) => Ok(Value::Null),
        Err(err) => memory_failure(interpreter, err),
    }
}

/// `mem.set(block, offset, byte)`
fn mem_set(interpreter: &mut Interpreter, args: &[Value]) -> NativeResult {
    if !memory_enabled(interpreter, "set") {
        return Ok(Value::Null);
    }
    let (block, at, byte) = match (handle_arg(args, 0), number_arg(args, 1), number_arg(args, 2)) {
        (Some(block), Some(at), Some(byte)) => (block, at, byte),
        _ => return failure(interpreter, "Error: mem.set expects (ptr, offset, value)"),
    };
    match block.set_byte(offset(at), byte as u8) {
        Ok(()) => Ok(Value::Null),
        Err(err) => memory_failure(interpreter, err),
    }
}

/// `mem.get(block, offset)`
fn mem_get(interpreter: &mut Interpreter, args: &[Value]) -> NativeResult {
    if !memory_enabled(interpreter, "get") {
        return Ok(Value::Null);
    }
    let (block, at) = match (handle_arg(args, 0), number_arg(args, 1)) {
        (Some(block), Some(at)) => (block, at),
        _ => return failure(interpreter, "Error: mem.get expects (ptr, offset)"),
    };
    match block.get_byte(offset(at)) {
        Ok(byte) => Ok(Value::Number(f64::from(byte))),
        Err(err) => memory_failure(interpreter, err),
    }
}

fn sys_sleep(_: &mut Interpreter, args: &[Value]) -> NativeResult {
    if let Some(ms) = number_arg(args, 0) {
        thread::sleep(Duration::from_millis(ms.max(0.0) as u64));
    }
    Ok(Value::Null)
}

fn sys_exit(_: &mut Interpreter, args: &[Value]) -> NativeResult {
    let code = number_arg(args, 0).map_or(0, |n| n as i32);
    Err(RuntimeError::Exit { code })
}

fn executable_memory(interpreter: &mut Interpreter, name: &str) -> NativeResult {
    warn!(builtin = name, "executable memory is not supported");
    failure(
        interpreter,
        &format!("Error: asm.{} is not supported: executable memory is disabled", name),
    )
}

fn asm_alloc_exec(interpreter: &mut Interpreter, _: &[Value]) -> NativeResult {
    executable_memory(interpreter, "alloc_exec")
}

fn asm_exec(interpreter: &mut Interpreter, _: &[Value]) -> NativeResult {
    executable_memory(interpreter, "exec")
}

#[cfg(test)]
mod builtins_tests {
    use crate::builtins::{file_method, lookup, method};
    use crate::config::Options;
    use crate::dict::Dict;
    use crate::error::RuntimeError;
    use crate::interpreter::Interpreter;
    use crate::shared_list::SharedList;
    use crate::value::Value;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::io::{self, Write};
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct Capture(Rc<RefCell<Vec<u8>>>);

    impl Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Capture {
        fn text(&self) -> String {
            String::from_utf8(self.0.borrow().clone()).unwrap()
        }
    }

    fn interpreter() -> (Interpreter, Capture) {
        let out = Capture::default();
        (Interpreter::new().with_output(Box::new(out.clone())), out)
    }

    fn call(interpreter: &mut Interpreter, name: &str, args: Vec<Value>) -> Value {
        let function = lookup(name).unwrap();
        (function.call)(interpreter, &args).unwrap()
    }

    fn s(text: &str) -> Value {
        Value::Str(text.to_string())
    }

    fn n(x: f64) -> Value {
        Value::Number(x)
    }

    #[test]
    fn named_builtins_win_over_aliases() {
        assert_eq!(lookup("len").unwrap().name, "len");
        assert_eq!(lookup("slice").unwrap().name, "slice");
        assert_eq!(method("len").unwrap().name, "len");
        assert!(lookup("nope").is_none());
        assert!(file_method("write").is_some());
        assert!(file_method("open").is_none());
    }

    #[test]
    fn slicing_clamps() {
        let (mut i, _) = interpreter();
        let cases = [
            (-3.0, -1.0, "ll"),
            (10.0, 20.0, ""),
            (2.0, 1.0, ""),
            (1.0, 3.0, "el"),
            (-10.0, 2.0, "he"),
            (0.0, 99.0, "hello"),
        ];
        for (start, end, expected) in cases.iter() {
            let value = call(&mut i, "str_slice", vec![s("hello"), n(*start), n(*end)]);
            assert_eq!(value.to_string(), *expected, "slice {} {}", start, end);
        }
        assert!(call(&mut i, "str_slice", vec![s("hello"), n(1.0)]).is_null());
    }

    #[test]
    fn string_helpers() {
        let (mut i, _) = interpreter();
        assert_eq!(
            call(&mut i, "str_replace", vec![s("a-b-c"), s("-"), s("+")]).to_string(),
            "a+b-c"
        );
        assert_eq!(call(&mut i, "str_len", vec![s("héllo")]).to_string(), "5");
        assert_eq!(call(&mut i, "len", vec![s("abc")]).to_string(), "3");
        assert_eq!(call(&mut i, "len", vec![n(7.0)]).to_string(), "0");
        assert_eq!(call(&mut i, "len", vec![]).to_string(), "0");
    }

    #[test]
    fn math_defaults() {
        let (mut i, _) = interpreter();
        assert_eq!(call(&mut i, "max", vec![]).to_string(), "0");
        assert_eq!(call(&mut i, "max", vec![n(3.0), s("x"), n(9.0)]).to_string(), "9");
        assert_eq!(call(&mut i, "min", vec![s("x"), n(4.0)]).to_string(), "0");
        assert_eq!(call(&mut i, "min", vec![n(5.0), n(-2.0)]).to_string(), "-2");
        assert_eq!(call(&mut i, "abs", vec![n(-2.5)]).to_string(), "2.5");
        assert_eq!(call(&mut i, "abs", vec![s("x")]).to_string(), "0");
        assert_eq!(call(&mut i, "sqrt", vec![n(16.0)]).to_string(), "4");
        assert!(call(&mut i, "sqrt", vec![n(16.0), n(1.0)]).is_null());
    }

    #[test]
    fn lists_are_shared() {
        let (mut i, _) = interpreter();
        let list = SharedList::new();
        let alias = Value::List(list.clone());
        assert_eq!(call(&mut i, "list_append", vec![alias.clone(), n(1.0)]).to_string(), "1");
        call(&mut i, "append", vec![alias.clone(), n(2.0)]);
        assert_eq!(list.len(), 2);
        assert_eq!(call(&mut i, "list_pop", vec![alias.clone()]).to_string(), "2");
        call(&mut i, "pop", vec![alias.clone()]);
        assert!(call(&mut i, "pop", vec![alias]).is_null());
    }

    #[test]
    fn print_and_error_messages_go_to_the_output() {
        let (mut i, out) = interpreter();
        call(&mut i, "print", vec![s("a"), n(1.5), Value::Null]);
        call(&mut i, "read_file", vec![]);
        call(&mut i, "write_file", vec![s("only one")]);
        assert_eq!(
            out.text(),
            "a 1.5 null\nError: read_file expects a single string argument\nError: write_file expects (filename, content)\n"
        );
    }

    #[test]
    fn json_is_reindented() {
        let (mut i, _) = interpreter();
        let pretty = call(&mut i, "json_format", vec![s(r#"{"b":1,"a":[true,null]}"#)]);
        assert_eq!(
            pretty.to_string(),
            "{\n  \"b\": 1,\n  \"a\": [\n    true,\n    null\n  ]\n}"
        );
        assert!(call(&mut i, "json_format", vec![s("{oops")]).is_null());
    }

    #[test]
    fn memory_needs_unsafe_mode() {
        let (mut i, out) = interpreter();
        assert!(call(&mut i, "alloc", vec![n(4.0)]).is_null());
        assert!(out.text().starts_with("Error: mem.alloc requires unsafe mode"));

        let (i, _) = interpreter();
        let mut i = i.with_options(Options {
            strict: false,
            unsafe_memory: true,
        });
        let block = call(&mut i, "alloc", vec![n(4.0)]);
        call(&mut i, "set", vec![block.clone(), n(2.0), n(65.0)]);
        assert_eq!(call(&mut i, "get", vec![block.clone(), n(2.0)]).to_string(), "65");
        assert!(call(&mut i, "get", vec![block, n(-1.0)]).is_null());
    }

    #[test]
    fn dicts_list_their_keys_and_values() {
        let (mut i, _) = interpreter();
        let mut dict = Dict::new();
        dict.insert("name", s("tess"));
        let dict = Value::Dict(dict.shared());
        match call(&mut i, "dict_keys", vec![dict.clone()]) {
            Value::List(keys) => assert_eq!(keys.get(0).map(|k| k.to_string()), Some("name".to_string())),
            other => panic!("expected a list, got {:?}", other),
        }
        match call(&mut i, "values", vec![dict]) {
            Value::List(values) => assert_eq!(values.len(), 1),
            other => panic!("expected a list, got {:?}", other),
        }
        assert!(call(&mut i, "keys", vec![n(1.0)]).is_null());
    }

    #[test]
    fn huge_allocations_fail_softly() {
        let (i, out) = interpreter();
        let mut i = i.with_options(Options {
            strict: false,
            unsafe_memory: true,
        });
        assert!(call(&mut i, "alloc", vec![n(99999999999999999999.0)]).is_null());
        assert!(call(&mut i, "alloc", vec![n(1e12)]).is_null());
        assert_eq!(
            out.text(),
            format!(
                "Error: cannot allocate {} bytes\nError: cannot allocate 1000000000000 bytes\n",
                usize::MAX
            )
        );
    }

    #[test]
    fn exit_unwinds() {
        let (mut i, _) = interpreter();
        let exit = lookup("exit").unwrap();
        match (exit.call)(&mut i, &[n(3.0)]) {
            Err(RuntimeError::Exit { code }) => assert_eq!(code, 3),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn executable_memory_is_refused() {
        let (mut i, out) = interpreter();
        assert!(call(&mut i, "alloc_exec", vec![n(64.0)]).is_null());
        assert!(out.text().contains("asm.alloc_exec is not supported"));
    }
}
