//! Params derive macro implementation.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{DeriveInput, Fields, parse2};

/// Container-level options parsed from `#[param(...)]` attributes.
#[derive(Debug, Clone, Default)]
struct ContainerOptions {
    /// Rename all fields (or variants) using the given case convention.
    rename_all: Option<RenameRule>,
}

/// Case conversion rules for `rename_all`.
#[derive(Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
enum RenameRule {
    /// `lowercase`
    LowerCase,
    /// `UPPERCASE`
    UpperCase,
    /// `camelCase`
    CamelCase,
    /// `PascalCase`
    PascalCase,
    /// `snake_case`
    SnakeCase,
    /// `SCREAMING_SNAKE_CASE`
    ScreamingSnakeCase,
    /// `kebab-case`
    KebabCase,
}

impl RenameRule {
    /// Parse a rename rule from a string.
    fn parse(s: &str) -> Option<Self> {
        match s {
            "lowercase" => Some(Self::LowerCase),
            "UPPERCASE" => Some(Self::UpperCase),
            "camelCase" => Some(Self::CamelCase),
            "PascalCase" => Some(Self::PascalCase),
            "snake_case" => Some(Self::SnakeCase),
            "SCREAMING_SNAKE_CASE" => Some(Self::ScreamingSnakeCase),
            "kebab-case" => Some(Self::KebabCase),
            _ => None,
        }
    }

    /// Apply the rename rule to a field or variant name.
    fn apply(self, name: &str) -> String {
        match self {
            Self::LowerCase => name.to_lowercase(),
            Self::UpperCase => name.to_uppercase(),
            Self::CamelCase => to_camel_case(&to_snake_case(name)),
            Self::PascalCase => to_pascal_case(&to_snake_case(name)),
            Self::SnakeCase => to_snake_case(name),
            Self::ScreamingSnakeCase => to_snake_case(name).to_uppercase(),
            Self::KebabCase => to_snake_case(name).replace('_', "-"),
        }
    }
}

/// Convert a string to `snake_case`.
fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    for (i, c) in s.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                result.push('_');
            }
            result.push(c.to_lowercase().next().unwrap_or(c));
        } else {
            result.push(c);
        }
    }
    result
}

/// Convert a `snake_case` string to `camelCase`.
fn to_camel_case(s: &str) -> String {
    let mut result = String::new();
    let mut capitalize_next = false;
    for c in s.chars() {
        if c == '_' {
            capitalize_next = true;
        } else if capitalize_next {
            result.push(c.to_uppercase().next().unwrap_or(c));
            capitalize_next = false;
        } else {
            result.push(c);
        }
    }
    result
}

/// Convert a `snake_case` string to `PascalCase`.
fn to_pascal_case(s: &str) -> String {
    let camel = to_camel_case(s);
    let mut chars = camel.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Field options parsed from `#[param(...)]` attributes.
#[derive(Debug, Clone, Default)]
struct FieldOptions {
    /// Wire name override.
    rename: Option<String>,
    /// Leave the field out of the parameter tree.
    skip: bool,
    /// Merge the entries of the nested map into the parent.
    flatten: bool,
    /// `ListStyle` variant for list fields.
    list: Option<syn::Ident>,
}

/// Expand the `#[derive(Params)]` macro.
pub fn expand_params_derive(input: TokenStream) -> syn::Result<TokenStream> {
    let input: DeriveInput = parse2(input)?;
    let options = parse_container_options(&input.attrs)?;

    let body = match &input.data {
        syn::Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => expand_struct(fields, &options)?,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Params derive only supports structs with named fields",
                ));
            }
        },
        syn::Data::Enum(data) => expand_enum(data, &options)?,
        syn::Data::Union(_) => {
            return Err(syn::Error::new_spanned(
                &input,
                "Params derive only supports structs and unit enums",
            ));
        }
    };

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::stripe_kit::ToParameterValue for #name #ty_generics #where_clause {
            fn to_parameter_value(&self) -> ::stripe_kit::ParameterValue {
                #body
            }
        }
    })
}

fn expand_struct(
    fields: &syn::FieldsNamed,
    options: &ContainerOptions,
) -> syn::Result<TokenStream> {
    let mut field_handlers = Vec::new();

    for field in &fields.named {
        let Some(field_name) = field.ident.as_ref() else {
            continue;
        };
        let field_options = parse_field_options(&field.attrs)?;
        if field_options.skip {
            continue;
        }

        let value = quote! {
            ::stripe_kit::ToParameterValue::to_parameter_value(&self.#field_name)
        };

        if field_options.flatten {
            field_handlers.push(quote! {
                if let ::std::option::Option::Some(nested) = #value.into_map() {
                    map.extend(nested);
                }
            });
            continue;
        }

        // Explicit rename > rename_all > field name
        let key = if let Some(rename) = field_options.rename {
            rename
        } else if let Some(rule) = options.rename_all {
            rule.apply(&field_name.to_string())
        } else {
            field_name.to_string()
        };

        let value = match field_options.list {
            Some(style) => quote! { #value.with_list_style(::stripe_kit::ListStyle::#style) },
            None => value,
        };

        field_handlers.push(quote! {
            let value = #value;
            if !value.is_absent() {
                map.insert(::std::string::String::from(#key), value);
            }
        });
    }

    Ok(quote! {
        let mut map = ::stripe_kit::ParameterMap::new();
        #(#field_handlers)*
        ::stripe_kit::ParameterValue::Map(map)
    })
}

fn expand_enum(data: &syn::DataEnum, options: &ContainerOptions) -> syn::Result<TokenStream> {
    let mut arms = Vec::new();

    for variant in &data.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new_spanned(
                variant,
                "Params derive only supports unit variants",
            ));
        }

        let field_options = parse_field_options(&variant.attrs)?;
        let ident = &variant.ident;
        let wire = if let Some(rename) = field_options.rename {
            rename
        } else if let Some(rule) = options.rename_all {
            rule.apply(&ident.to_string())
        } else {
            ident.to_string()
        };

        arms.push(quote! { Self::#ident => #wire });
    }

    Ok(quote! {
        let wire: &str = match self {
            #(#arms,)*
        };
        ::stripe_kit::ParameterValue::String(::std::string::String::from(wire))
    })
}

/// Parse container options from `#[param(...)]` attributes.
fn parse_container_options(attrs: &[syn::Attribute]) -> syn::Result<ContainerOptions> {
    let mut options = ContainerOptions::default();

    for attr in attrs {
        if !attr.path().is_ident("param") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename_all") {
                let value: syn::LitStr = meta.value()?.parse()?;
                let rule = RenameRule::parse(&value.value()).ok_or_else(|| {
                    syn::Error::new_spanned(
                        &value,
                        format!(
                            "unknown rename_all value: \"{}\". Expected one of: \
                             lowercase, UPPERCASE, camelCase, PascalCase, \
                             snake_case, SCREAMING_SNAKE_CASE, kebab-case",
                            value.value()
                        ),
                    )
                })?;
                options.rename_all = Some(rule);
                Ok(())
            } else {
                Err(meta.error("unknown container attribute, expected `rename_all`"))
            }
        })?;
    }

    Ok(options)
}

/// Parse field (or variant) options from `#[param(...)]` attributes.
fn parse_field_options(attrs: &[syn::Attribute]) -> syn::Result<FieldOptions> {
    let mut options = FieldOptions::default();

    for attr in attrs {
        if !attr.path().is_ident("param") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                let value: syn::LitStr = meta.value()?.parse()?;
                options.rename = Some(value.value());
            } else if meta.path.is_ident("skip") {
                options.skip = true;
            } else if meta.path.is_ident("flatten") {
                options.flatten = true;
            } else if meta.path.is_ident("list") {
                let value: syn::LitStr = meta.value()?.parse()?;
                let style = match value.value().as_str() {
                    "indexed" => "Indexed",
                    "brackets" => "Brackets",
                    "repeat" => "Repeat",
                    "csv" => "Csv",
                    other => {
                        return Err(syn::Error::new_spanned(
                            &value,
                            format!(
                                "unknown list style: \"{other}\". Expected one of: \
                                 indexed, brackets, repeat, csv"
                            ),
                        ));
                    }
                };
                options.list = Some(format_ident!("{style}"));
            } else {
                return Err(meta.error(
                    "unknown field attribute, expected one of `rename`, `skip`, `flatten`, `list`",
                ));
            }
            Ok(())
        })?;
    }

    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rename_rules() {
        assert_eq!(RenameRule::SnakeCase.apply("DisputeEvidence"), "dispute_evidence");
        assert_eq!(RenameRule::SnakeCase.apply("account_holder_name"), "account_holder_name");
        assert_eq!(RenameRule::CamelCase.apply("account_holder_name"), "accountHolderName");
        assert_eq!(RenameRule::PascalCase.apply("card_error"), "CardError");
        assert_eq!(RenameRule::ScreamingSnakeCase.apply("ManualReview"), "MANUAL_REVIEW");
        assert_eq!(RenameRule::KebabCase.apply("OffSession"), "off-session");
        assert_eq!(RenameRule::LowerCase.apply("Usd"), "usd");
    }

    #[test]
    fn rename_rule_parse() {
        assert!(RenameRule::parse("snake_case").is_some());
        assert!(RenameRule::parse("SCREAMING-KEBAB-CASE").is_none());
    }

    #[test]
    fn struct_expansion_uses_wire_names() {
        let input = quote! {
            #[param(rename_all = "snake_case")]
            struct UpdateBankAccount {
                account_holder_name: Option<String>,
                #[param(rename = "metadata")]
                meta: Option<Metadata>,
                #[param(list = "brackets")]
                expand: Vec<String>,
                #[param(flatten)]
                page: Pagination,
                #[param(skip)]
                internal: u8,
            }
        };

        let output = expand_params_derive(input).expect("expand").to_string();

        assert!(output.contains("\"account_holder_name\""));
        assert!(output.contains("\"metadata\""));
        assert!(output.contains("ListStyle :: Brackets"));
        assert!(output.contains("into_map"));
        assert!(!output.contains("internal"));
    }

    #[test]
    fn enum_expansion_maps_variants() {
        let input = quote! {
            #[param(rename_all = "snake_case")]
            enum CaptureMethod {
                Automatic,
                #[param(rename = "manual")]
                Later,
            }
        };

        let output = expand_params_derive(input).expect("expand").to_string();

        assert!(output.contains("\"automatic\""));
        assert!(output.contains("\"manual\""));
    }

    #[test]
    fn rejects_tuple_structs_and_data_variants() {
        assert!(expand_params_derive(quote! { struct Id(String); }).is_err());
        assert!(expand_params_derive(quote! { enum Source { Card(String) } }).is_err());
    }

    #[test]
    fn rejects_unknown_attributes() {
        let input = quote! {
            struct Params {
                #[param(format = "csv")]
                tags: Vec<String>,
            }
        };
        assert!(expand_params_derive(input).is_err());

        let input = quote! {
            struct Params {
                #[param(list = "pipes")]
                tags: Vec<String>,
            }
        };
        assert!(expand_params_derive(input).is_err());
    }
}
