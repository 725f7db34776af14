pub mod descriptor_set;

pub(crate) use descriptor_set::DescriptorSetLoader;
