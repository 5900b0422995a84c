//! Bean types: typed objects mapped through an explicit accessor table.
//!
//! A bean type describes itself once, in [`Bean::class`], by listing its
//! constructors, getters and setters together with the method names it would be
//! known by. The mapper then applies the usual accessor conventions to that
//! table:
//!
//! - `getFoo` / `get_foo` and `isFoo` / `is_foo` read property `foo`
//! - `setFoo` / `set_foo` writes property `foo`
//! - [`BeanClass::property`] overrides the derived name, and a setter without an
//!   override inherits the one given to its matching getter
//! - [`BeanClass::transient`] keeps a getter out of the simplified form
//!
//! Beanification runs in two phases. The deserialization constructor consumes the
//! entries named by its parameters, then every remaining entry is handed to the
//! setter of the same property. Both phases fail on anything left unmatched.
//!
//! ## Examples
//!
//! ```rust
//! use beanson::{bean_mapping, decode, beanify, encode, simplify, Bean, BeanClass};
//!
//! #[derive(Debug, PartialEq)]
//! struct Point {
//!     x: i32,
//!     y: i32,
//!     label: String,
//! }
//!
//! impl Bean for Point {
//!     fn class() -> BeanClass<Self> {
//!         BeanClass::new()
//!             .constructor(["x", "y"], |args| {
//!                 Ok(Point { x: args.next()?, y: args.next()?, label: String::new() })
//!             })
//!             .getter("getX", |p: &Point| p.x)
//!             .getter("getY", |p: &Point| p.y)
//!             .getter("getLabel", |p: &Point| p.label.clone())
//!             .setter("setLabel", |p: &mut Point, label: String| p.label = label)
//!     }
//! }
//!
//! bean_mapping!(Point);
//!
//! let point = Point { x: 1, y: 2, label: "origin".to_string() };
//! let text = encode(&simplify(&point));
//! assert_eq!(text, r#"{"label":"origin","x":1,"y":2}"#);
//!
//! let back: Option<Point> = beanify(decode(&text).unwrap()).unwrap();
//! assert_eq!(back, Some(point));
//! ```

use crate::beanify::{beanify_value, incompatible};
use crate::introspect::{choose_constructor, find_property_getters, find_property_setters};
use crate::{Beanify, Error, Map, Result, Simplify, Value};
use log::trace;
use std::any::type_name;
use std::error::Error as StdError;

/// The result of a constructor or setter body.
pub type InvokeResult<T> = std::result::Result<T, Box<dyn StdError + Send + Sync>>;

type BuildFn<T> = Box<dyn Fn(&mut Arguments) -> InvokeResult<T>>;
type GetFn<T> = Box<dyn Fn(&T) -> Value>;
type SetFn<T> = Box<dyn Fn(&mut T, Value) -> InvokeResult<()>>;

/// A type that can be simplified and beanified through its accessor table.
///
/// Implement this, then invoke [`bean_mapping!`](crate::bean_mapping) to derive
/// [`Simplify`] and [`Beanify`] from it.
pub trait Bean: Sized + 'static {
    fn class() -> BeanClass<Self>;
}

/// A constructor parameter, optionally annotated with the property it reads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Param {
    pub(crate) property: Option<&'static str>,
}

impl Param {
    pub const fn named(property: &'static str) -> Self {
        Param {
            property: Some(property),
        }
    }

    pub const fn unnamed() -> Self {
        Param { property: None }
    }
}

impl From<&'static str> for Param {
    fn from(property: &'static str) -> Self {
        Param::named(property)
    }
}

pub(crate) struct Constructor<T> {
    pub(crate) params: Vec<Param>,
    build: BuildFn<T>,
}

pub(crate) enum MethodKind<T> {
    Getter(GetFn<T>),
    Setter(SetFn<T>),
}

pub(crate) struct Method<T> {
    pub(crate) name: &'static str,
    pub(crate) property: Option<&'static str>,
    pub(crate) transient: bool,
    pub(crate) kind: MethodKind<T>,
}

impl<T> Method<T> {
    pub(crate) fn is_getter(&self) -> bool {
        matches!(self.kind, MethodKind::Getter(_))
    }

    pub(crate) fn is_setter(&self) -> bool {
        matches!(self.kind, MethodKind::Setter(_))
    }
}

/// The accessor table of a bean type.
///
/// Built with a chain of registrations; see the [module documentation](self).
pub struct BeanClass<T> {
    pub(crate) name: &'static str,
    pub(crate) constructors: Vec<Constructor<T>>,
    pub(crate) methods: Vec<Method<T>>,
}

impl<T: 'static> Default for BeanClass<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> BeanClass<T> {
    #[must_use]
    pub fn new() -> Self {
        BeanClass {
            name: type_name::<T>(),
            constructors: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// The name of the bean type, as used in error messages.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Registers a constructor.
    ///
    /// `build` reads its arguments from [`Arguments`] in parameter order. Either
    /// every parameter names its property or none does; an unnamed constructor
    /// with parameters is never chosen for deserialization.
    #[must_use]
    pub fn constructor<P, F>(mut self, params: P, build: F) -> Self
    where
        P: IntoIterator,
        P::Item: Into<Param>,
        F: Fn(&mut Arguments) -> InvokeResult<T> + 'static,
    {
        self.constructors.push(Constructor {
            params: params.into_iter().map(Into::into).collect(),
            build: Box::new(build),
        });
        self
    }

    /// Registers the zero-argument constructor.
    #[must_use]
    pub fn default_constructor<F>(mut self, build: F) -> Self
    where
        F: Fn() -> T + 'static,
    {
        self.constructors.push(Constructor {
            params: Vec::new(),
            build: Box::new(move |_: &mut Arguments| Ok(build())),
        });
        self
    }

    /// Registers a readable accessor under its method name.
    #[must_use]
    pub fn getter<R, F>(self, name: &'static str, get: F) -> Self
    where
        R: Simplify + 'static,
        F: Fn(&T) -> R + 'static,
    {
        self.push_method(
            name,
            MethodKind::Getter(Box::new(move |bean: &T| get(bean).simplify())),
        )
    }

    /// Registers a single-argument mutator under its method name.
    #[must_use]
    pub fn setter<A, F>(self, name: &'static str, set: F) -> Self
    where
        A: Beanify + 'static,
        F: Fn(&mut T, A) + 'static,
    {
        self.push_method(
            name,
            MethodKind::Setter(Box::new(move |bean: &mut T, value: Value| -> InvokeResult<()> {
                let arg = beanify_value::<A>(value)?;
                set(bean, arg);
                Ok(())
            })),
        )
    }

    /// Registers a single-argument mutator that may reject its argument.
    #[must_use]
    pub fn try_setter<A, E, F>(self, name: &'static str, set: F) -> Self
    where
        A: Beanify + 'static,
        E: Into<Box<dyn StdError + Send + Sync>> + 'static,
        F: Fn(&mut T, A) -> std::result::Result<(), E> + 'static,
    {
        self.push_method(
            name,
            MethodKind::Setter(Box::new(move |bean: &mut T, value: Value| -> InvokeResult<()> {
                let arg = beanify_value::<A>(value)?;
                set(bean, arg).map_err(Into::into)
            })),
        )
    }

    /// Annotates the most recently registered accessor with an explicit property name.
    ///
    /// # Panics
    ///
    /// Panics if no accessor has been registered yet.
    #[must_use]
    pub fn property(mut self, property: &'static str) -> Self {
        self.last_method("property").property = Some(property);
        self
    }

    /// Marks the most recently registered accessor as transient.
    ///
    /// # Panics
    ///
    /// Panics if no accessor has been registered yet.
    #[must_use]
    pub fn transient(mut self) -> Self {
        self.last_method("transient").transient = true;
        self
    }

    fn push_method(mut self, name: &'static str, kind: MethodKind<T>) -> Self {
        self.methods.push(Method {
            name,
            property: None,
            transient: false,
            kind,
        });
        self
    }

    fn last_method(&mut self, annotation: &str) -> &mut Method<T> {
        let name = self.name;
        match self.methods.last_mut() {
            Some(method) => method,
            None => panic!("{} annotation on {} precedes any accessor", annotation, name),
        }
    }
}

/// Constructor arguments, already taken out of the source mapping.
pub struct Arguments {
    values: std::vec::IntoIter<Value>,
    target: &'static str,
}

impl Arguments {
    fn new(values: Vec<Value>, target: &'static str) -> Self {
        Arguments {
            values: values.into_iter(),
            target,
        }
    }

    /// Beanifies the next argument into `A`.
    ///
    /// # Errors
    ///
    /// Fails when the value does not fit `A`, or when the constructor reads more
    /// arguments than it declared parameters.
    #[allow(clippy::should_implement_trait)]
    pub fn next<A: Beanify>(&mut self) -> Result<A> {
        match self.values.next() {
            Some(value) => beanify_value(value),
            None => Err(Error::beanification(
                "Constructor reads more arguments than it declares",
                self.target,
            )),
        }
    }
}

/// Reads every non-transient property of `bean` into a mapping.
pub fn simplify_bean<T: Bean>(bean: &T) -> Value {
    let class = T::class();
    let mut map = Map::new();
    for (property, method) in find_property_getters(&class) {
        if method.transient {
            continue;
        }
        if let MethodKind::Getter(get) = &method.kind {
            map.insert(property, get(bean));
        }
    }
    Value::Map(map)
}

/// Builds a `T` from a mapping: constructor properties first, setters after.
///
/// # Errors
///
/// Returns [`Error::Beanification`] when `value` is not a mapping, a constructor
/// property is missing, an entry has no setter, or a constructor or setter fails.
pub fn beanify_bean<T: Bean>(value: Value) -> Result<T> {
    let class = T::class();
    let mut map = match value {
        Value::Map(map) => map,
        other => return Err(incompatible::<T>(&other)),
    };

    let constructor = choose_constructor(&class).ok_or_else(|| {
        Error::beanification("No suitable deserialization constructor found", class.name)
    })?;
    let mut values = Vec::with_capacity(constructor.params.len());
    for property in constructor.params.iter().filter_map(|p| p.property) {
        match map.remove(property) {
            Some(value) => values.push(value),
            None => {
                return Err(Error::beanification(
                    format!("Missing value for constructor property {}", property),
                    class.name,
                ))
            }
        }
    }
    let mut bean = (constructor.build)(&mut Arguments::new(values, class.name))
        .map_err(|e| invocation_error(e, "Error creating bean instance", class.name))?;

    let setters = find_property_setters(&class);
    for (key, value) in map {
        let set = match setters.get(&key).map(|m| &m.kind) {
            Some(MethodKind::Setter(set)) => set,
            _ => {
                return Err(Error::beanification(
                    format!("No setter found for property {}", key),
                    class.name,
                ))
            }
        };
        trace!("setting property {} of {}", key, class.name);
        set(&mut bean, value).map_err(|e| {
            invocation_error(
                e,
                format!("Error invoking setter for property {}", key),
                class.name,
            )
        })?;
    }
    Ok(bean)
}

/// Mapping errors raised while reading arguments pass through unchanged; any
/// other failure becomes the cause of a new one.
fn invocation_error(
    err: Box<dyn StdError + Send + Sync>,
    msg: impl Into<String>,
    target: &str,
) -> Error {
    match err.downcast::<Error>() {
        Ok(err) => *err,
        Err(cause) => Error::beanification_caused(msg, target, cause),
    }
}
