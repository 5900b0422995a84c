//! Discovery of properties and constructors in a [`BeanClass`].

use crate::bean::{BeanClass, Constructor, Method};
use indexmap::IndexMap;
use log::debug;

const GET: &str = "get";
const IS: &str = "is";
const SET: &str = "set";

/// Strips `prefix` from a camel-case (`getFoo`) or snake-case (`get_foo`) method name.
fn strip_accessor_prefix<'a>(name: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = name.strip_prefix(prefix)?;
    if let Some(snake) = rest.strip_prefix('_') {
        return (!snake.is_empty()).then_some(snake);
    }
    let first = rest.chars().next()?;
    (!first.is_lowercase()).then_some(rest)
}

fn is_setter_name(name: &str) -> bool {
    strip_accessor_prefix(name, SET).is_some()
}

/// Derives the property name of a `get`/`is`/`set` accessor.
///
/// Returns `None` for names that follow none of the conventions.
pub(crate) fn property_name_of(name: &str) -> Option<String> {
    let rest = strip_accessor_prefix(name, GET)
        .or_else(|| strip_accessor_prefix(name, IS))
        .or_else(|| strip_accessor_prefix(name, SET))?;
    let mut chars = rest.chars();
    let first = chars.next()?;
    Some(first.to_lowercase().chain(chars).collect())
}

/// Finds the getter a setter for `property` pairs with.
fn find_getter<'c, T>(class: &'c BeanClass<T>, property: &str) -> Option<&'c Method<T>> {
    let mut chars = property.chars();
    let capitalized: String = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => return None,
    };
    let candidates = [
        format!("{}{}", GET, capitalized),
        format!("{}_{}", GET, property),
        format!("{}{}", IS, capitalized),
        format!("{}_{}", IS, property),
    ];
    class
        .methods
        .iter()
        .filter(|m| m.is_getter())
        .find(|m| candidates.iter().any(|c| c == m.name))
}

/// Maps each readable property to its getter.
///
/// A getter is named by its annotation when it has one, otherwise by the
/// accessor convention. Getters that follow neither are skipped.
pub(crate) fn find_property_getters<T>(class: &BeanClass<T>) -> IndexMap<String, &Method<T>> {
    let mut getters = IndexMap::new();
    for method in class.methods.iter().filter(|m| m.is_getter()) {
        let property = match method.property {
            Some(property) => Some(property.to_string()),
            None if is_setter_name(method.name) => None,
            None => property_name_of(method.name),
        };
        match property {
            Some(property) => {
                getters.insert(property, method);
            }
            None => debug!(
                "ignoring getter {} of {}: not a property accessor",
                method.name, class.name
            ),
        }
    }
    getters
}

/// Maps each writable property to its setter.
///
/// A setter without an annotation of its own takes the annotation of the
/// matching `get`/`is` getter, if that has one.
pub(crate) fn find_property_setters<T>(class: &BeanClass<T>) -> IndexMap<String, &Method<T>> {
    let mut setters = IndexMap::new();
    for method in class.methods.iter().filter(|m| m.is_setter()) {
        let conventional = if is_setter_name(method.name) {
            property_name_of(method.name)
        } else {
            None
        };
        let annotated = method.property.or_else(|| {
            conventional
                .as_deref()
                .and_then(|p| find_getter(class, p))
                .and_then(|getter| getter.property)
        });
        match annotated.map(str::to_string).or(conventional) {
            Some(property) => {
                setters.insert(property, method);
            }
            None => debug!(
                "ignoring setter {} of {}: not a property accessor",
                method.name, class.name
            ),
        }
    }
    setters
}

/// Whether every parameter carries a property annotation.
///
/// # Panics
///
/// Panics when only some of the parameters are annotated.
fn is_property_constructor<T>(class: &BeanClass<T>, constructor: &Constructor<T>) -> bool {
    let annotated = constructor
        .params
        .iter()
        .filter(|p| p.property.is_some())
        .count();
    if annotated > 0 && annotated < constructor.params.len() {
        panic!(
            "If any constructor parameter of {} is annotated with a property, then all of them must be annotated.",
            class.name
        );
    }
    annotated > 0
}

/// Picks the deserialization constructor: the first one with every parameter
/// annotated, or else the zero-argument one.
///
/// # Panics
///
/// Panics when a constructor has partially annotated parameters.
pub(crate) fn choose_constructor<T>(class: &BeanClass<T>) -> Option<&Constructor<T>> {
    let mut property_constructor = None;
    let mut default_constructor = None;
    for constructor in &class.constructors {
        if is_property_constructor(class, constructor) {
            property_constructor = property_constructor.or(Some(constructor));
        } else if constructor.params.is_empty() {
            default_constructor = default_constructor.or(Some(constructor));
        }
    }
    let chosen = property_constructor.or(default_constructor);
    if let Some(constructor) = chosen {
        debug!(
            "deserializing {} through constructor of {} parameters",
            class.name,
            constructor.params.len()
        );
    }
    chosen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Param;

    #[derive(Default)]
    struct Widget {
        size: i32,
        visible: bool,
    }

    fn widget_class() -> BeanClass<Widget> {
        BeanClass::new()
            .default_constructor(Widget::default)
            .getter("getSize", |w: &Widget| w.size)
            .property("width")
            .setter("setSize", |w: &mut Widget, size: i32| w.size = size)
            .getter("is_visible", |w: &Widget| w.visible)
            .setter("set_visible", |w: &mut Widget, visible: bool| w.visible = visible)
            .getter("area", |w: &Widget| w.size * w.size)
            .getter("dimensions", |w: &Widget| w.size)
            .property("dims")
            .setter("resize", |w: &mut Widget, size: i32| w.size = size)
    }

    #[test]
    fn test_property_name_of() {
        assert_eq!(property_name_of("getFoo").as_deref(), Some("foo"));
        assert_eq!(property_name_of("getURL").as_deref(), Some("uRL"));
        assert_eq!(property_name_of("isEnabled").as_deref(), Some("enabled"));
        assert_eq!(property_name_of("setFooBar").as_deref(), Some("fooBar"));
        assert_eq!(property_name_of("get_foo_bar").as_deref(), Some("foo_bar"));
        assert_eq!(property_name_of("is_ready").as_deref(), Some("ready"));
        assert_eq!(property_name_of("set_x").as_deref(), Some("x"));
        assert_eq!(property_name_of("get"), None);
        assert_eq!(property_name_of("get_"), None);
        assert_eq!(property_name_of("getaway"), None);
        assert_eq!(property_name_of("island"), None);
        assert_eq!(property_name_of("size"), None);
    }

    #[test]
    fn test_getters() {
        let class = widget_class();
        let getters = find_property_getters(&class);
        let names: Vec<_> = getters.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["width", "visible", "dims"]);
    }

    #[test]
    fn test_setters_inherit_getter_annotation() {
        let class = widget_class();
        let setters = find_property_setters(&class);
        assert_eq!(setters.get("width").map(|m| m.name), Some("setSize"));
        assert_eq!(setters.get("visible").map(|m| m.name), Some("set_visible"));
        assert!(!setters.contains_key("size"));
        assert!(!setters.contains_key("resize"));
    }

    #[test]
    fn test_constructor_choice() {
        let class = BeanClass::<Widget>::new()
            .default_constructor(Widget::default)
            .constructor([Param::unnamed()], |args| {
                Ok(Widget {
                    size: args.next()?,
                    visible: false,
                })
            })
            .constructor(["size"], |args| {
                Ok(Widget {
                    size: args.next()?,
                    visible: true,
                })
            });
        let chosen = choose_constructor(&class).unwrap();
        assert_eq!(chosen.params, vec![Param::named("size")]);

        let class = BeanClass::<Widget>::new().default_constructor(Widget::default);
        assert!(choose_constructor(&class).unwrap().params.is_empty());

        let class = BeanClass::<Widget>::new().constructor([Param::unnamed()], |args| {
            Ok(Widget {
                size: args.next()?,
                visible: false,
            })
        });
        assert!(choose_constructor(&class).is_none());
    }

    #[test]
    #[should_panic(expected = "then all of them must be annotated")]
    fn test_partial_annotation_panics() {
        let class = BeanClass::<Widget>::new().constructor(
            [Param::named("size"), Param::unnamed()],
            |args| {
                Ok(Widget {
                    size: args.next()?,
                    visible: args.next()?,
                })
            },
        );
        choose_constructor(&class);
    }
}
