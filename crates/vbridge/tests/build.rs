//! Component build tests: option application, data conflicts and
//! back-reference wiring.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use vbridge::{
    data, data_typed, el, new_vm, new_vm_with, slot, template, BridgeError, BridgeOptions,
    BridgeResult, ForeignContext, ForeignValue, Model, Object, Runtime, Vm,
};
use vbridge_engine::{Constructor, Engine};

#[derive(Model)]
struct Todo {
    object: Object,
    vm: Option<Vm>,
}

#[derive(Model)]
struct Detached {
    object: Object,
    label: String,
}

/// Counts how often the back-reference slot is handed out.
struct Tracked {
    object: Object,
    vm: Option<Vm>,
    wired: Rc<Cell<usize>>,
}

impl Model for Tracked {
    fn from_object(object: Object) -> Self {
        Self {
            object,
            vm: None,
            wired: Rc::default(),
        }
    }

    fn object(&self) -> &Object {
        &self.object
    }

    fn vm_slot(&mut self) -> Option<&mut Option<Vm>> {
        self.wired.set(self.wired.get() + 1);
        Some(&mut self.vm)
    }
}

fn setup() -> (Rc<Engine>, Runtime) {
    let engine = Engine::new();
    let runtime: Runtime = engine.clone();
    (engine, runtime)
}

#[test]
fn test_back_reference_holds_instance() {
    let (_engine, runtime) = setup();
    let todo = Rc::new(RefCell::new(Todo::from_object(Object::create(Rc::clone(
        &runtime,
    )))));
    let vm = new_vm(runtime, [el("#todo"), data_typed(Rc::clone(&todo))]).unwrap();

    let todo = todo.borrow();
    assert_eq!(todo.vm.as_ref(), Some(&vm));
    assert_eq!(vm.data().unwrap(), todo.object);
    assert_eq!(vm.el().unwrap().as_string().unwrap(), "#todo");
}

#[test]
fn test_back_reference_wired_once() {
    let (_engine, runtime) = setup();
    let tracked = Rc::new(RefCell::new(Tracked::from_object(Object::create(
        Rc::clone(&runtime),
    ))));
    let counter = Rc::clone(&tracked.borrow().wired);
    let vm = new_vm(runtime, [data_typed(Rc::clone(&tracked))]).unwrap();

    assert_eq!(counter.get(), 1);
    assert_eq!(tracked.borrow().vm.as_ref(), Some(&vm));
}

#[test]
fn test_struct_without_back_reference() {
    let (engine, runtime) = setup();
    let detached = Rc::new(RefCell::new(Detached::from_object(Object::create(
        Rc::clone(&runtime),
    ))));
    new_vm(runtime, [data_typed(Rc::clone(&detached))]).unwrap();
    assert_eq!(engine.constructed(), 1);
    assert!(detached.borrow().label.is_empty());
}

#[test]
fn test_flat_data_without_back_reference() {
    let (_engine, runtime) = setup();
    let vm = new_vm(runtime, [data("title", "groceries"), data("done", false)]).unwrap();

    let data = vm.data().unwrap();
    assert_eq!(data.get("title").unwrap().as_string().unwrap(), "groceries");
    assert_eq!(data.get("done").unwrap().as_bool(), Some(false));
}

#[test]
fn test_conflict_aborts_before_constructor() {
    let (engine, runtime) = setup();
    let todo = Rc::new(RefCell::new(Todo::from_object(Object::create(Rc::clone(
        &runtime,
    )))));

    let err = new_vm(
        Rc::clone(&runtime),
        [data("x", 1), data_typed(Rc::clone(&todo))],
    )
    .unwrap_err();
    assert!(matches!(err, BridgeError::DataConflict { .. }));

    let err = new_vm(runtime, [data_typed(Rc::clone(&todo)), data("x", 1)]).unwrap_err();
    assert!(matches!(err, BridgeError::DataConflict { .. }));

    assert_eq!(engine.constructed(), 0);
    assert!(todo.borrow().vm.is_none());
}

#[test]
fn test_borrowed_struct_aborts_before_constructor() {
    let (engine, runtime) = setup();
    let todo = Rc::new(RefCell::new(Todo::from_object(Object::create(Rc::clone(
        &runtime,
    )))));

    let reader = todo.borrow();
    let err = new_vm(runtime, [el("#todo"), data_typed(Rc::clone(&todo))]).unwrap_err();
    assert_eq!(err, BridgeError::DataBorrowed);
    assert_eq!(engine.constructed(), 0);
    assert!(reader.vm.is_none());
}

#[test]
fn test_passthrough_and_template_reach_record() {
    let (engine, runtime) = setup();
    new_vm(
        runtime,
        [
            template("<li>{{ title }}</li>"),
            slot("name", "todo-item"),
            slot("props", serde_json::json!({ "title": "String" })),
        ],
    )
    .unwrap();

    let record = engine.last_record().unwrap();
    let template = engine.get(record, "template").unwrap();
    assert_eq!(engine.read_string(template).unwrap(), "<li>{{ title }}</li>");
    let name = engine.get(record, "name").unwrap();
    assert_eq!(engine.read_string(name).unwrap(), "todo-item");
    let props = engine.get(record, "props").unwrap();
    assert_eq!(engine.keys(props).unwrap(), vec!["title"]);
}

#[test]
fn test_custom_constructor_name() {
    let (engine, runtime) = setup();
    engine.register_constructor(
        "Widget",
        Rc::new(vbridge_engine::component::construct_component),
    );
    let options = BridgeOptions::from_toml_str("constructor = \"Widget\"").unwrap();
    let vm = new_vm_with(&options, runtime, [el("#w")]).unwrap();
    assert_eq!(engine.constructed(), 1);
    assert!(vm.object().is_object());
}

#[test]
fn test_constructor_error_propagates_unchanged() {
    let (engine, runtime) = setup();
    let rejecting: Constructor = Rc::new(
        |_: &Engine, _: &[ForeignValue]| -> BridgeResult<ForeignValue> {
            Err(BridgeError::Thrown("rejected".to_string()))
        },
    );
    engine.register_constructor("Vue", rejecting);
    let err = new_vm(runtime, [el("#app")]).unwrap_err();
    assert_eq!(err, BridgeError::Thrown("rejected".to_string()));
}
