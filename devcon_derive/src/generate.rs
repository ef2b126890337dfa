mod command;
mod compound;

#[cfg(test)]
mod test {
    pub(crate) fn ident(name: &str) -> syn::Ident {
        syn::Ident::new(name, proc_macro2::Span::call_site())
    }
}
