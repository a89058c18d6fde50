use darling::ast::NestedMeta;
use darling::FromMeta;
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    parse_macro_input, Attribute, Data, DeriveInput, Field, Fields, GenericArgument, Meta,
    PathArguments, Type, Visibility,
};

#[derive(Debug, Default, FromMeta)]
struct BindArgs {
    #[darling(default)]
    column: Option<String>,
}

/// How a marked field stores its model.
enum Slot {
    /// `Option<Model>`
    Owned(Type),
    /// `Option<Arc<Model>>`
    Shared(Type),
}

impl Slot {
    fn model(&self) -> &Type {
        match self {
            Slot::Owned(ty) | Slot::Shared(ty) => ty,
        }
    }
}

pub fn derive_bindable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match generate_bindable_impl(&input) {
        Ok(expanded) => TokenStream::from(expanded),
        Err(err) => TokenStream::from(err.write_errors()),
    }
}

fn generate_bindable_impl(input: &DeriveInput) -> darling::Result<TokenStream2> {
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(darling::Error::custom(
                    "#[derive(Bindable)] only supports structs with named fields",
                )
                .with_span(&input.ident));
            }
        },
        _ => {
            return Err(
                darling::Error::custom("#[derive(Bindable)] can only be applied to structs")
                    .with_span(&input.ident),
            );
        }
    };

    let mut errors = darling::Error::accumulator();
    let mut specs = Vec::new();
    let mut assign_arms = Vec::new();
    let mut value_arms = Vec::new();

    for field in fields {
        let markers = bind_attrs(field);
        for duplicate in markers.iter().skip(1) {
            errors.push(
                darling::Error::custom("duplicate #[bind] marker on this field")
                    .with_span(*duplicate),
            );
        }
        let marker = match markers.first() {
            Some(attr) => match errors.handle(parse_bind_attr(attr)) {
                Some(args) => Some(args),
                None => continue,
            },
            None => None,
        };

        if !matches!(field.vis, Visibility::Public(_)) {
            if marker.is_some() {
                errors.push(
                    darling::Error::custom("#[bind] can only be used on `pub` fields")
                        .with_span(&field.ident),
                );
            }
            continue;
        }

        let Some(ident) = &field.ident else { continue };
        let name = ident.to_string();

        let Some(args) = marker else {
            let declared = declared_type(&field.ty);
            specs.push(quote! { ::autobind::FieldSpec::new(#name, #declared) });
            continue;
        };

        let Some(slot) = slot_of(&field.ty) else {
            errors.push(
                darling::Error::custom(
                    "#[bind] fields must be declared as `Option<Model>` or `Option<Arc<Model>>`",
                )
                .with_span(&field.ty),
            );
            continue;
        };

        let column = args.column.unwrap_or_else(|| "id".to_string());
        let model = slot.model();

        if is_abstract(model) {
            // No concrete type to look up; the binder always skips it.
            specs.push(quote! {
                ::autobind::FieldSpec::new(#name, None)
                    .with_marker(::autobind::BindableProperty::new(#column))
            });
            continue;
        }

        specs.push(quote! {
            ::autobind::FieldSpec::new(#name, Some(::std::any::type_name::<#model>()))
                .with_marker(::autobind::BindableProperty::new(#column))
        });

        let store = match &slot {
            Slot::Owned(_) => quote! { ::std::sync::Arc::unwrap_or_clone(model) },
            Slot::Shared(_) => quote! { model },
        };
        assign_arms.push(quote! {
            #name => {
                let model = model.downcast::<#model>().map_err(|_| {
                    ::autobind::BindError::TypeMismatch {
                        field: #name.to_string(),
                        expected: ::std::any::type_name::<#model>().to_string(),
                    }
                })?;
                self.#ident = Some(#store);
                Ok(())
            }
        });

        let as_model = match &slot {
            Slot::Owned(_) => quote! { value },
            Slot::Shared(_) => quote! { &**value },
        };
        value_arms.push(quote! {
            #name => self
                .#ident
                .as_ref()
                .and_then(|value| ::autobind::introspect::serialize_field(#name, #as_model)),
        });
    }

    errors.finish()?;

    Ok(quote! {
        impl #impl_generics ::autobind::Bindable for #struct_name #ty_generics #where_clause {
            fn fields() -> ::std::vec::Vec<::autobind::FieldSpec> {
                ::std::vec![#(#specs),*]
            }

            #[allow(unused_variables)]
            fn assign(
                &mut self,
                field: &str,
                model: ::autobind::ModelInstance,
            ) -> ::autobind::Result<()> {
                match field {
                    #(#assign_arms)*
                    _ => Err(::autobind::BindError::UnknownField {
                        field: field.to_string(),
                    }),
                }
            }

            fn field_value(
                &self,
                field: &str,
            ) -> ::std::option::Option<::autobind::serde_json::Value> {
                match field {
                    #(#value_arms)*
                    _ => None,
                }
            }
        }
    })
}

fn bind_attrs(field: &Field) -> Vec<&Attribute> {
    field
        .attrs
        .iter()
        .filter(|attr| attr.path().is_ident("bind"))
        .collect()
}

fn parse_bind_attr(attr: &Attribute) -> darling::Result<BindArgs> {
    match &attr.meta {
        Meta::Path(_) => Ok(BindArgs::default()),
        Meta::List(list) => {
            let items = NestedMeta::parse_meta_list(list.tokens.clone())?;
            BindArgs::from_list(&items)
        }
        Meta::NameValue(_) => Err(darling::Error::custom(
            "expected #[bind] or #[bind(column = \"...\")]",
        )
        .with_span(attr)),
    }
}

/// `Some(type_name)` tokens for a plain field, `None` for trait objects.
fn declared_type(ty: &Type) -> TokenStream2 {
    if is_abstract(ty) {
        quote! { None }
    } else {
        quote! { Some(::std::any::type_name::<#ty>()) }
    }
}

fn slot_of(ty: &Type) -> Option<Slot> {
    let inner = generic_inner(ty, "Option")?;
    Some(match generic_inner(inner, "Arc") {
        Some(model) => Slot::Shared(model.clone()),
        None => Slot::Owned(inner.clone()),
    })
}

/// Extract `T` from `Wrapper<T>`
fn generic_inner<'a>(ty: &'a Type, wrapper: &str) -> Option<&'a Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    let segment = type_path.path.segments.last()?;
    if segment.ident != wrapper {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first()? {
        GenericArgument::Type(inner) => Some(inner),
        _ => None,
    }
}

/// Whether the type is (or wraps) a trait object or `impl Trait`.
fn is_abstract(ty: &Type) -> bool {
    match ty {
        Type::TraitObject(_) | Type::ImplTrait(_) => true,
        Type::Paren(paren) => is_abstract(&paren.elem),
        Type::Group(group) => is_abstract(&group.elem),
        Type::Path(type_path) => type_path
            .path
            .segments
            .iter()
            .any(|segment| has_abstract_argument(&segment.arguments)),
        _ => false,
    }
}

fn has_abstract_argument(arguments: &PathArguments) -> bool {
    let PathArguments::AngleBracketed(args) = arguments else {
        return false;
    };
    args.args.iter().any(|arg| match arg {
        GenericArgument::Type(inner) => is_abstract(inner),
        _ => false,
    })
}
