use decision_core::Lookup;

pub fn present(field: Lookup<'_>) -> bool {
    !field.is_absent()
}

pub fn absent(field: Lookup<'_>) -> bool {
    field.is_absent()
}
