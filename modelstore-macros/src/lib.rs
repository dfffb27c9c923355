//! Procedural macros for the modelstore project.
//!
//! Provides `#[derive(Model)]`, which implements `modelstore::model::Model`
//! from a handful of attributes:
//!
//! ```ignore
//! #[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, Model)]
//! #[model(collection = "users", validate)]
//! pub struct User {
//!     #[serde(flatten)]
//!     #[model(record)]
//!     pub record: Record,
//!     #[model(search)]
//!     #[validate(length(min = 3))]
//!     pub name: String,
//!     #[model(search)]
//!     pub tags: Vec<String>,
//! }
//! ```
//!
//! - `collection = "..."` (required) names the collection.
//! - `validate` delegates `Model::validate` to the type's `validator::Validate` impl.
//! - `#[model(id)]` marks a `String` field as the document id.
//! - `#[model(record)]` marks an embedded `Record` whose `id` is the document id.
//! - `#[model(search)]` adds the field to the search terms.
//!
//! Exactly one field must be marked `id` or `record`.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Error, Fields, Ident, LitStr};

#[proc_macro_derive(Model, attributes(model))]
pub fn derive_model(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    expand_model(&input)
        .unwrap_or_else(Error::into_compile_error)
        .into()
}

enum IdSource {
    Field(Ident),
    Record(Ident),
}

struct ModelOptions {
    collection: LitStr,
    validate: bool,
}

fn expand_model(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let options = parse_options(input)?;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(Error::new_spanned(
                    &input.ident,
                    "Model can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(Error::new_spanned(&input.ident, "Model can only be derived for structs"));
        }
    };

    let mut id_source = None;
    let mut search_fields = Vec::new();

    for field in fields {
        let Some(ident) = field.ident.clone() else {
            continue;
        };

        for attr in field.attrs.iter().filter(|attr| attr.path().is_ident("model")) {
            attr.parse_nested_meta(|meta| {
                let source = if meta.path.is_ident("id") {
                    Some(IdSource::Field(ident.clone()))
                } else if meta.path.is_ident("record") {
                    Some(IdSource::Record(ident.clone()))
                } else if meta.path.is_ident("search") {
                    search_fields.push(ident.clone());
                    None
                } else {
                    return Err(meta.error("expected `id`, `record` or `search`"));
                };

                if let Some(source) = source {
                    if id_source.is_some() {
                        return Err(meta.error("only one field may be marked `id` or `record`"));
                    }
                    id_source = Some(source);
                }

                Ok(())
            })?;
        }
    }

    let document_id = match id_source {
        Some(IdSource::Field(ident)) => quote! { &self.#ident },
        Some(IdSource::Record(ident)) => quote! { &self.#ident.id },
        None => {
            return Err(Error::new_spanned(
                &input.ident,
                "Model requires a field marked #[model(id)] or #[model(record)]",
            ));
        }
    };

    let name = &input.ident;
    let collection = &options.collection;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let search_terms = if search_fields.is_empty() {
        quote! {}
    } else {
        quote! {
            fn search_terms(&self) -> ::std::vec::Vec<::std::string::String> {
                let mut terms = ::std::vec::Vec::new();
                #( ::modelstore::search::SearchTerms::push_terms(&self.#search_fields, &mut terms); )*
                terms
            }
        }
    };

    let validate = if options.validate {
        quote! {
            fn validate(&self) -> ::std::vec::Vec<::modelstore::validation::FieldError> {
                ::modelstore::validation::validate(self)
            }
        }
    } else {
        quote! {}
    };

    Ok(quote! {
        impl #impl_generics ::modelstore::model::Model for #name #ty_generics #where_clause {
            fn collection_name() -> &'static str {
                #collection
            }

            fn document_id(&self) -> &str {
                #document_id
            }

            #search_terms
            #validate
        }
    })
}

fn parse_options(input: &DeriveInput) -> syn::Result<ModelOptions> {
    let mut collection = None;
    let mut validate = false;

    for attr in input.attrs.iter().filter(|attr| attr.path().is_ident("model")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("collection") {
                collection = Some(meta.value()?.parse::<LitStr>()?);
                Ok(())
            } else if meta.path.is_ident("validate") {
                validate = true;
                Ok(())
            } else {
                Err(meta.error("expected `collection = \"...\"` or `validate`"))
            }
        })?;
    }

    let collection = collection.ok_or_else(|| {
        Error::new_spanned(&input.ident, "Model requires #[model(collection = \"...\")]")
    })?;

    if collection.value().is_empty() {
        return Err(Error::new_spanned(&collection, "collection name must not be empty"));
    }

    Ok(ModelOptions { collection, validate })
}
