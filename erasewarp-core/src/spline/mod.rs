pub(crate) mod bicubic;
