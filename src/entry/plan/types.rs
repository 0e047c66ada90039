use crate::args::GeneratorArgs;
use crate::catalog::EndpointCatalog;

pub(in crate::entry) struct GeneratePlan {
    pub(in crate::entry) args: GeneratorArgs,
    pub(in crate::entry) base_url: String,
    pub(in crate::entry) catalog: EndpointCatalog,
}

pub(in crate::entry) enum RunPlan {
    PrintCatalog(EndpointCatalog),
    Generate(Box<GeneratePlan>),
}
