/// Builds a [`Value`](crate::Value) from a JSON-like literal.
///
/// Mapping entries keep the order they are written in; anything that is not a
/// keyword, list or mapping literal is simplified.
///
/// Inside a list or mapping every element must be a single token tree, so a
/// negative number or any other multi-token expression needs parentheses:
/// `beanson!([1, (-2)])`, `beanson!({ "a": (-1) })`.
///
/// ```rust
/// use beanson::{beanson, encode};
///
/// let name = "Alice";
/// let value = beanson!({ "name": name, "tags": ["a", 'b'], "age": 30, "spouse": null });
/// assert_eq!(encode(&value), r#"{"age":30,"name":"Alice","spouse":null,"tags":["a","b"]}"#);
/// ```
#[macro_export]
macro_rules! beanson {
    (null) => {
        $crate::Value::Null
    };

    (true) => {
        $crate::Value::Bool(true)
    };

    (false) => {
        $crate::Value::Bool(false)
    };

    ([]) => {
        $crate::Value::List(vec![])
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::List(vec![$($crate::beanson!($elem)),*])
    };

    ({}) => {
        $crate::Value::Map($crate::Map::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut map = $crate::Map::new();
        $(
            map.insert($key.to_string(), $crate::beanson!($value));
        )*
        $crate::Value::Map(map)
    }};

    ($e:expr) => {
        $crate::simplify(&$e)
    };
}

/// Implements [`Simplify`](crate::Simplify) and [`Beanify`](crate::Beanify) for
/// types that implement [`Bean`](crate::Bean).
///
/// ```rust
/// use beanson::{bean_mapping, from_str, to_string, Bean, BeanClass};
///
/// #[derive(Default)]
/// struct Settings {
///     volume: u8,
/// }
///
/// impl Bean for Settings {
///     fn class() -> BeanClass<Self> {
///         BeanClass::new()
///             .default_constructor(Settings::default)
///             .getter("getVolume", |s: &Settings| s.volume)
///             .setter("setVolume", |s: &mut Settings, volume: u8| s.volume = volume)
///     }
/// }
///
/// bean_mapping!(Settings);
///
/// let settings: Settings = from_str("{volume: 7}").unwrap().unwrap();
/// assert_eq!(settings.volume, 7);
/// assert_eq!(to_string(&settings), r#"{"volume":7}"#);
/// ```
#[macro_export]
macro_rules! bean_mapping {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::Simplify for $ty {
                fn simplify(&self) -> $crate::Value {
                    $crate::bean::simplify_bean(self)
                }
            }

            impl $crate::Beanify for $ty {
                fn beanify(value: $crate::Value) -> $crate::Result<Self> {
                    $crate::bean::beanify_bean(value)
                }
            }
        )+
    };
}

#[cfg(test)]
mod tests {
    use crate::{Map, Number, Value};

    #[test]
    fn test_beanson_macro_primitives() {
        assert_eq!(beanson!(null), Value::Null);
        assert_eq!(beanson!(true), Value::Bool(true));
        assert_eq!(beanson!(false), Value::Bool(false));
        assert_eq!(beanson!(42), Value::Number(Number::I32(42)));
        assert_eq!(beanson!(3.5), Value::Number(Number::F64(3.5)));
        assert_eq!(beanson!("hello"), Value::String("hello".to_string()));
    }

    #[test]
    fn test_beanson_macro_lists() {
        assert_eq!(beanson!([]), Value::List(vec![]));
        assert_eq!(
            beanson!([1, "a", null]),
            Value::List(vec![Value::from(1), Value::from("a"), Value::Null])
        );
    }

    #[test]
    fn test_beanson_macro_maps() {
        assert_eq!(beanson!({}), Value::Map(Map::new()));

        let value = beanson!({ "b": 1, "a": [true] });
        let map = value.as_map().unwrap();
        let keys: Vec<_> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(map.get("a"), Some(&Value::List(vec![Value::Bool(true)])));
    }
}
