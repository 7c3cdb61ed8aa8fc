//! Behaviour of `#[derive(Params)]` through the public encoders.

#![allow(missing_docs)]

use assert2::{check, let_assert};
use bytes::Bytes;
use stripe_kit::{
    Clearable, Error, Metadata, Pagination, ParameterValue, Params, ToParameterValue,
    flatten_params, to_form, to_query_string,
};

fn form(params: &impl ToParameterValue) -> String {
    String::from_utf8_lossy(&to_form(params).expect("form")).into_owned()
}

#[derive(Params)]
struct Plain {
    name: String,
    nickname: Option<String>,
    amount: i64,
    live: bool,
    ratio: f64,
}

#[test]
fn fields_keep_declaration_order_and_absent_fields_vanish() {
    let params = Plain {
        name: "Jenny Rosen".into(),
        nickname: None,
        amount: -5,
        live: false,
        ratio: 2.5,
    };

    check!(form(&params) == "name=Jenny%20Rosen&amount=-5&live=false&ratio=2.5");
}

#[derive(Params)]
#[param(rename_all = "camelCase")]
struct Renamed {
    payment_method: String,
    #[param(rename = "type")]
    type_: String,
    #[param(skip)]
    #[allow(dead_code)]
    local_only: String,
}

#[test]
fn rename_beats_rename_all_and_skip_drops_the_field() {
    let params = Renamed {
        payment_method: "pm_1".into(),
        type_: "card".into(),
        local_only: "never sent".into(),
    };

    check!(form(&params) == "paymentMethod=pm_1&type=card");
}

#[derive(Params)]
struct Filter {
    customer: Option<String>,
    #[param(flatten)]
    page: Pagination,
}

#[test]
fn flatten_merges_into_the_parent() {
    let params = Filter {
        customer: Some("cus_1".into()),
        page: Pagination {
            limit: Some(10),
            starting_after: Some("cus_0".into()),
            ending_before: None,
        },
    };

    check!(to_query_string(&params).expect("query") == "customer=cus_1&limit=10&starting_after=cus_0");
}

#[derive(Params)]
struct Lists {
    indexed: Vec<String>,
    #[param(list = "brackets")]
    brackets: Vec<String>,
    #[param(list = "repeat")]
    repeat: Vec<i64>,
    #[param(list = "csv")]
    csv: Option<Vec<String>>,
    #[param(list = "brackets")]
    missing: Option<Vec<String>>,
}

#[test]
fn each_list_field_uses_its_own_style() {
    let params = Lists {
        indexed: vec!["a".into(), "b".into()],
        brackets: vec!["c".into()],
        repeat: vec![1, 2],
        csv: Some(vec!["x".into(), "y".into()]),
        missing: None,
    };

    let pairs = flatten_params(&params).expect("pairs");
    let keys: Vec<_> = pairs.iter().map(|(key, value)| format!("{key}={value}")).collect();
    check!(
        keys == [
            "indexed[0]=a",
            "indexed[1]=b",
            "brackets[]=c",
            "repeat=1",
            "repeat=2",
            "csv=x,y",
        ]
    );
}

#[derive(Params)]
struct Item {
    price: String,
    quantity: Option<u32>,
}

#[derive(Params)]
struct Order {
    items: Vec<Item>,
}

#[test]
fn lists_of_structs_are_indexed_maps() {
    let params = Order {
        items: vec![
            Item {
                price: "price_1".into(),
                quantity: Some(2),
            },
            Item {
                price: "price_2".into(),
                quantity: None,
            },
        ],
    };

    check!(
        form(&params)
            == "items%5B0%5D%5Bprice%5D=price_1&items%5B0%5D%5Bquantity%5D=2\
                &items%5B1%5D%5Bprice%5D=price_2"
    );
}

#[derive(Params)]
struct CsvOfMaps {
    #[param(list = "csv")]
    items: Vec<Item>,
}

#[test]
fn csv_rejects_nested_values() {
    let params = CsvOfMaps {
        items: vec![Item {
            price: "price_1".into(),
            quantity: None,
        }],
    };

    let_assert!(Err(Error::InvalidRequest(_)) = to_form(&params));
}

#[derive(Debug, Clone, Copy, Params)]
#[param(rename_all = "snake_case")]
enum Interval {
    Month,
    #[param(rename = "yearly")]
    Year,
    BiWeekly,
}

#[test]
fn enums_encode_their_wire_string() {
    check!(Interval::Month.to_parameter_value() == ParameterValue::String("month".into()));
    check!(Interval::Year.to_parameter_value() == ParameterValue::String("yearly".into()));
    check!(Interval::BiWeekly.to_parameter_value() == ParameterValue::String("bi_weekly".into()));
}

#[derive(Params)]
struct Update {
    description: Option<Clearable<String>>,
    email: Option<Clearable<String>>,
    metadata: Option<Metadata>,
}

#[test]
fn clear_is_an_empty_value_and_absent_is_nothing() {
    let params = Update {
        description: Some(Clearable::Clear),
        email: None,
        metadata: Some([("plan".to_string(), String::new())].into_iter().collect()),
    };

    check!(form(&params) == "description=&metadata%5Bplan%5D=");
}

#[derive(Params)]
struct Nested {
    shipping: Option<Shipping>,
}

#[derive(Params)]
struct Shipping {
    name: Option<String>,
    phone: Option<String>,
}

#[test]
fn empty_nested_structs_produce_no_pairs() {
    let params = Nested {
        shipping: Some(Shipping {
            name: None,
            phone: None,
        }),
    };

    check!(flatten_params(&params).expect("pairs").is_empty());
}

#[derive(Params)]
struct WithBinary {
    file: Bytes,
}

#[test]
fn binary_cannot_be_form_encoded() {
    let params = WithBinary {
        file: Bytes::from_static(b"%PDF"),
    };

    let_assert!(Err(err) = to_form(&params));
    check!(err.is_invalid_request());
}

#[test]
fn reserved_characters_are_percent_encoded() {
    let params = Plain {
        name: "a+b=c&d/é".into(),
        nickname: Some("[x]".into()),
        amount: 0,
        live: true,
        ratio: 0.5,
    };

    check!(
        form(&params)
            == "name=a%2Bb%3Dc%26d%2F%C3%A9&nickname=%5Bx%5D&amount=0&live=true&ratio=0.5"
    );
}
