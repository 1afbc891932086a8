use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{Data, DeriveInput, Fields, Ident, LitInt, parse_macro_input};

/// Divisors the timer hardware can be programmed with, paired with the
/// `Prescaler` variant that represents them.
const SUPPORTED_PRESCALERS: &[(u32, &str)] = &[
    (1, "Div1"),
    (8, "Div8"),
    (64, "Div64"),
    (256, "Div256"),
    (1024, "Div1024"),
];

/// Derives the `ClockConfig` trait for a unit struct.
///
/// The CPU frequency and prescale divisor are given in a `#[clock(...)]`
/// attribute and checked when the macro expands, so an unsupported divisor or
/// a frequency that is not a whole number of MHz never reaches the firmware.
///
/// # Example
///
/// ```ignore
/// use uptime_clock::ClockConfig;
///
/// #[derive(ClockConfig)]
/// #[clock(cpu_hz = 16_000_000, prescaler = 64)]
/// pub struct BoardClock;
/// ```
///
/// This generates:
///
/// ```ignore
/// impl ::uptime_clock::config::ClockConfig for BoardClock {
///     const CPU_HZ: u32 = 16000000u32;
///     const PRESCALER: ::uptime_clock::config::Prescaler =
///         ::uptime_clock::config::Prescaler::Div64;
/// }
/// ```
///
/// # Requirements
///
/// - The type must be a unit struct
/// - `cpu_hz` must be a non-zero multiple of 1 MHz
/// - `prescaler` must be one of 1, 8, 64, 256 or 1024
///
/// Checks that depend on both values together (divisor/frequency ratio,
/// compare target range) run when the configuration is first used by a
/// `SysTimer`.
#[proc_macro_derive(ClockConfig, attributes(clock))]
pub fn derive_clock_config(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;

    match &input.data {
        Data::Struct(data) if matches!(data.fields, Fields::Unit) => {}
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "ClockConfig can only be derived for unit structs",
            ));
        }
    }

    let mut cpu_hz: Option<LitInt> = None;
    let mut prescaler: Option<LitInt> = None;

    for attr in input.attrs.iter().filter(|a| a.path().is_ident("clock")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("cpu_hz") {
                cpu_hz = Some(meta.value()?.parse()?);
                Ok(())
            } else if meta.path.is_ident("prescaler") {
                prescaler = Some(meta.value()?.parse()?);
                Ok(())
            } else {
                Err(meta.error("expected `cpu_hz` or `prescaler`"))
            }
        })?;
    }

    let cpu_hz = cpu_hz.ok_or_else(|| {
        syn::Error::new_spanned(input, "missing `#[clock(cpu_hz = ...)]`")
    })?;
    let prescaler = prescaler.ok_or_else(|| {
        syn::Error::new_spanned(input, "missing `#[clock(prescaler = ...)]`")
    })?;

    let hz: u32 = cpu_hz.base10_parse()?;
    if hz == 0 || hz % 1_000_000 != 0 {
        return Err(syn::Error::new_spanned(
            &cpu_hz,
            "cpu_hz must be a non-zero multiple of 1_000_000",
        ));
    }

    let divisor: u32 = prescaler.base10_parse()?;
    let variant = SUPPORTED_PRESCALERS
        .iter()
        .find(|(d, _)| *d == divisor)
        .map(|(_, v)| Ident::new(v, Span::call_site()))
        .ok_or_else(|| {
            syn::Error::new_spanned(
                &prescaler,
                "unsupported prescaler, expected one of 1, 8, 64, 256, 1024",
            )
        })?;

    Ok(quote! {
        impl ::uptime_clock::config::ClockConfig for #name {
            const CPU_HZ: u32 = #hz;
            const PRESCALER: ::uptime_clock::config::Prescaler =
                ::uptime_clock::config::Prescaler::#variant;
        }
    })
}
