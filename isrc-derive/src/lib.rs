use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, Lit, Meta, Type};

/// Derive macro describing the CSV columns a record type reads.
///
/// For each named field it records:
/// - the column name (`#[serde(rename = "...")]` wins over the field name)
/// - whether the column is required (`Option<T>` and `#[serde(default)]`
///   fields are optional)
/// - a description taken from the field's doc comment
///
/// Generates `csv_schema() -> &'static [CsvField]` and
/// `csv_header() -> &'static [&'static str]`. `CsvField` must be in scope at
/// the derive site.
#[proc_macro_derive(CsvSchema, attributes(serde))]
pub fn derive_csv_schema(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return syn::Error::new_spanned(name, "CsvSchema needs named fields")
                    .to_compile_error()
                    .into()
            }
        },
        _ => {
            return syn::Error::new_spanned(name, "CsvSchema only supports structs")
                .to_compile_error()
                .into()
        }
    };

    let mut columns = Vec::new();
    for field in fields {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let serde = match SerdeField::from_attrs(&field.attrs) {
            Ok(serde) => serde,
            Err(err) => return err.to_compile_error().into(),
        };
        if serde.skip {
            continue;
        }
        let column = serde.rename.unwrap_or_else(|| ident.to_string());
        let required = !(serde.default || is_option_type(&field.ty));
        let doc = doc_comment(&field.attrs);
        columns.push((column, required, doc));
    }

    let entries = columns.iter().map(|(column, required, doc)| {
        quote! {
            CsvField {
                name: #column,
                required: #required,
                description: #doc,
            }
        }
    });
    let header = columns.iter().map(|(column, _, _)| column);

    let expanded = quote! {
        impl #name {
            pub fn csv_schema() -> &'static [CsvField] {
                static SCHEMA: &[CsvField] = &[
                    #(#entries),*
                ];
                SCHEMA
            }

            pub fn csv_header() -> &'static [&'static str] {
                static HEADER: &[&str] = &[
                    #(#header),*
                ];
                HEADER
            }
        }
    };

    TokenStream::from(expanded)
}

/// The subset of `#[serde(...)]` field attributes that change the CSV shape.
#[derive(Default)]
struct SerdeField {
    rename: Option<String>,
    default: bool,
    skip: bool,
}

impl SerdeField {
    fn from_attrs(attrs: &[syn::Attribute]) -> syn::Result<Self> {
        let mut out = SerdeField::default();
        for attr in attrs.iter().filter(|a| a.path().is_ident("serde")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") && meta.input.peek(syn::Token![=]) {
                    let lit: syn::LitStr = meta.value()?.parse()?;
                    out.rename = Some(lit.value());
                } else if meta.path.is_ident("default") {
                    // `default` or `default = "path"`
                    if meta.input.peek(syn::Token![=]) {
                        let _: syn::LitStr = meta.value()?.parse()?;
                    }
                    out.default = true;
                } else if meta.path.is_ident("skip") || meta.path.is_ident("skip_deserializing")
                {
                    out.skip = true;
                } else if meta.input.peek(syn::Token![=]) {
                    let _: syn::Expr = meta.value()?.parse()?;
                } else if meta.input.peek(syn::token::Paren) {
                    // e.g. `rename(serialize = "..")`, which does not affect reading
                    let _content;
                    syn::parenthesized!(_content in meta.input);
                }
                Ok(())
            })?;
        }
        Ok(out)
    }
}

fn doc_comment(attrs: &[syn::Attribute]) -> String {
    attrs
        .iter()
        .filter_map(|attr| {
            if !attr.path().is_ident("doc") {
                return None;
            }
            if let Meta::NameValue(meta) = &attr.meta {
                if let syn::Expr::Lit(expr_lit) = &meta.value {
                    if let Lit::Str(lit_str) = &expr_lit.lit {
                        return Some(lit_str.value().trim().to_string());
                    }
                }
            }
            None
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_option_type(ty: &Type) -> bool {
    if let Type::Path(type_path) = ty {
        if let Some(segment) = type_path.path.segments.last() {
            return segment.ident == "Option";
        }
    }
    false
}
