use beanson::{
    bean_mapping, beanify, decode, encode, from_str, simplify, to_string, Bean, BeanClass, Error,
    Value,
};
use chrono::{DateTime, TimeZone, Utc};
use std::collections::BTreeMap;

#[derive(Debug, Default, PartialEq)]
struct SimpleBean {
    foo: i32,
    bar: i32,
}

impl Bean for SimpleBean {
    fn class() -> BeanClass<Self> {
        BeanClass::new()
            .default_constructor(SimpleBean::default)
            .getter("getFoo", |b: &SimpleBean| b.foo)
            .setter("setFoo", |b: &mut SimpleBean, foo: i32| b.foo = foo)
            .getter("getBar", |b: &SimpleBean| b.bar)
            .setter("setBar", |b: &mut SimpleBean, bar: i32| b.bar = bar)
    }
}

#[derive(Clone, Debug, PartialEq)]
struct ImmutableBean {
    foo: i32,
    bar: i32,
}

impl Bean for ImmutableBean {
    fn class() -> BeanClass<Self> {
        BeanClass::new()
            .constructor(["foo", "bar"], |args| {
                Ok(ImmutableBean {
                    foo: args.next()?,
                    bar: args.next()?,
                })
            })
            .getter("getFoo", |b: &ImmutableBean| b.foo)
            .getter("getBar", |b: &ImmutableBean| b.bar)
    }
}

#[derive(Debug, PartialEq)]
struct MoreComplexBean {
    children: Vec<ImmutableBean>,
    x: i32,
}

impl Bean for MoreComplexBean {
    fn class() -> BeanClass<Self> {
        BeanClass::new()
            .constructor(["children"], |args| {
                Ok(MoreComplexBean {
                    children: args.next()?,
                    x: 0,
                })
            })
            .getter("getChildren", |b: &MoreComplexBean| b.children.clone())
            .getter("getX", |b: &MoreComplexBean| b.x)
            .setter("setX", |b: &mut MoreComplexBean, x: i32| b.x = x)
    }
}

#[derive(Debug, PartialEq)]
struct ArrayBean {
    children: Box<[ImmutableBean]>,
}

impl Bean for ArrayBean {
    fn class() -> BeanClass<Self> {
        BeanClass::new()
            .constructor(["children"], |args| {
                Ok(ArrayBean {
                    children: args.next()?,
                })
            })
            .getter("getChildren", |b: &ArrayBean| b.children.clone())
    }
}

#[derive(Debug, PartialEq)]
struct Event {
    name: String,
    at: DateTime<Utc>,
    tags: BTreeMap<String, i64>,
    note: Option<String>,
}

impl Bean for Event {
    fn class() -> BeanClass<Self> {
        BeanClass::new()
            .constructor(["name", "at"], |args| {
                Ok(Event {
                    name: args.next()?,
                    at: args.next()?,
                    tags: BTreeMap::new(),
                    note: None,
                })
            })
            .getter("get_name", |e: &Event| e.name.clone())
            .getter("get_at", |e: &Event| e.at)
            .getter("get_tags", |e: &Event| e.tags.clone())
            .setter("set_tags", |e: &mut Event, tags: BTreeMap<String, i64>| e.tags = tags)
            .getter("get_note", |e: &Event| e.note.clone())
            .setter("set_note", |e: &mut Event, note: Option<String>| e.note = note)
    }
}

#[derive(Debug, Default, PartialEq)]
struct Gadget {
    name: String,
    raw: Value,
    flag: bool,
}

impl Bean for Gadget {
    fn class() -> BeanClass<Self> {
        BeanClass::new()
            .default_constructor(Gadget::default)
            .getter("getName", |g: &Gadget| g.name.clone())
            .setter("setName", |g: &mut Gadget, name: String| g.name = name)
            .getter("getRaw", |g: &Gadget| g.raw.clone())
            .setter("setRaw", |g: &mut Gadget, raw: Value| g.raw = raw)
            .getter("isFlag", |g: &Gadget| g.flag)
            .property("on")
            .setter("setFlag", |g: &mut Gadget, flag: bool| g.flag = flag)
    }
}

bean_mapping!(SimpleBean, ImmutableBean, MoreComplexBean, ArrayBean, Event, Gadget);

fn two_children() -> Vec<ImmutableBean> {
    vec![
        ImmutableBean { foo: 42, bar: 6 },
        ImmutableBean { foo: 43, bar: 7 },
    ]
}

#[test]
fn test_encode_simple_bean() {
    let mut bean = SimpleBean::default();
    bean.foo = 42;
    bean.bar = 6;
    assert_eq!(encode(&simplify(&bean)), r#"{"bar":6,"foo":42}"#);
}

#[test]
fn test_encode_immutable_bean() {
    let bean = ImmutableBean { foo: 42, bar: 6 };
    assert_eq!(encode(&simplify(&bean)), r#"{"bar":6,"foo":42}"#);
}

#[test]
fn test_encode_more_complex_bean() {
    let bean = MoreComplexBean {
        children: two_children(),
        x: 11,
    };
    assert_eq!(
        to_string(&bean),
        r#"{"children":[{"bar":6,"foo":42},{"bar":7,"foo":43}],"x":11}"#
    );
}

#[test]
fn test_encode_array_bean() {
    let bean = ArrayBean {
        children: two_children().into_boxed_slice(),
    };
    assert_eq!(
        to_string(&bean),
        r#"{"children":[{"bar":6,"foo":42},{"bar":7,"foo":43}]}"#
    );
}

#[test]
fn test_decode_simple_bean() {
    let bean: SimpleBean = beanify(decode(r#"{"bar":6,"foo":42}"#).unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(bean, SimpleBean { foo: 42, bar: 6 });
}

#[test]
fn test_decode_immutable_bean() {
    let bean: ImmutableBean = from_str(r#"{"bar":6,"foo":42}"#).unwrap().unwrap();
    assert_eq!(bean, ImmutableBean { foo: 42, bar: 6 });
}

#[test]
fn test_decode_more_complex_bean() {
    let bean: MoreComplexBean = from_str(
        r#"{"children":[{"bar":6,"foo":42},{"bar":7,"foo":43}],"x":11}"#,
    )
    .unwrap()
    .unwrap();
    assert_eq!(bean.x, 11);
    assert_eq!(bean.children, two_children());
}

#[test]
fn test_decode_array_bean() {
    let bean: ArrayBean = from_str("{children: [{foo: 42, bar: 6}, {foo: 43, bar: 7}]}")
        .unwrap()
        .unwrap();
    assert_eq!(bean.children.len(), 2);
    assert_eq!(bean.children[1], ImmutableBean { foo: 43, bar: 7 });
}

#[test]
fn test_decode_from_lenient_text() {
    let bean: SimpleBean = from_str("{ foo = 42; bar => 0x06; }").unwrap().unwrap();
    assert_eq!(bean, SimpleBean { foo: 42, bar: 6 });
}

#[test]
fn test_null_gives_none() {
    assert_eq!(from_str::<ImmutableBean>("null").unwrap(), None);
}

#[test]
fn test_missing_constructor_property() {
    let err = from_str::<ImmutableBean>(r#"{"foo":42}"#).unwrap_err();
    assert!(err.is_beanification());
    assert!(err
        .to_string()
        .starts_with("Missing value for constructor property bar"));
    assert!(err.target().unwrap().ends_with("ImmutableBean"));
}

#[test]
fn test_unknown_property() {
    let err = from_str::<ImmutableBean>(r#"{"foo":42,"bar":6,"baz":1}"#).unwrap_err();
    assert!(err.to_string().starts_with("No setter found for property baz"));
}

#[test]
fn test_nested_null_is_rejected() {
    let err = from_str::<MoreComplexBean>(r#"{"children":null}"#).unwrap_err();
    assert!(err.to_string().starts_with("Unexpected null value"));

    let err = from_str::<MoreComplexBean>(r#"{"children":[null]}"#).unwrap_err();
    assert!(err.to_string().starts_with("Unexpected null value"));
}

#[test]
fn test_incompatible_value() {
    let err = from_str::<SimpleBean>("[1, 2]").unwrap_err();
    assert!(matches!(err, Error::Beanification { .. }));
    assert!(err.to_string().starts_with("Incompatible value list"));

    let err = from_str::<SimpleBean>("{foo: yes}").unwrap_err();
    assert!(err.to_string().starts_with("Incompatible value string"));
}

#[test]
fn test_syntax_error_is_not_beanification() {
    let err = from_str::<SimpleBean>("{foo: 1").unwrap_err();
    assert!(err.is_syntax());
}

#[test]
fn test_round_trip_with_dates_maps_and_options() {
    let mut tags = BTreeMap::new();
    tags.insert("priority".to_string(), 3);
    tags.insert("attendees".to_string(), 120);
    let event = Event {
        name: "launch".to_string(),
        at: Utc.timestamp_millis_opt(1_700_000_000_123).unwrap(),
        tags,
        note: None,
    };

    let text = to_string(&event);
    assert_eq!(
        text,
        r#"{"at":1700000000123,"name":"launch","note":null,"tags":{"attendees":120,"priority":3}}"#
    );
    let back: Event = from_str(&text).unwrap().unwrap();
    assert_eq!(back, event);
}

#[test]
fn test_simplified_form_is_plain_value() {
    let value = simplify(&ImmutableBean { foo: 1, bar: 2 });
    let map = value.as_map().unwrap();
    assert_eq!(map.get("foo"), Some(&Value::from(1)));
    assert_eq!(map.get("bar"), Some(&Value::from(2)));
}

#[test]
fn test_raw_values_pass_through() {
    let gadget: Gadget = from_str("{raw: [1, {a: b}], on: true}").unwrap().unwrap();
    assert_eq!(gadget.raw, decode("[1, {\"a\": \"b\"}]").unwrap());
    assert!(gadget.flag);
    assert_eq!(
        to_string(&gadget),
        r#"{"name":"","on":true,"raw":[1,{"a":"b"}]}"#
    );

    let gadget: Gadget = from_str("{raw: null}").unwrap().unwrap();
    assert_eq!(gadget.raw, Value::Null);
}

#[test]
fn test_setter_inherits_boolean_getter_property() {
    let gadget: Gadget = from_str("{on: true}").unwrap().unwrap();
    assert!(gadget.flag);

    let err = from_str::<Gadget>("{flag: true}").unwrap_err();
    assert!(err.to_string().starts_with("No setter found for property flag"));
}
